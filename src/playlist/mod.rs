pub mod error;
pub mod handlers;
pub mod service;
pub mod types;

pub use error::*;
pub use handlers::*;
pub use service::*;
pub use types::*;
