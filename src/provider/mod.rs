//! Song recommendations from a text generation provider.

pub mod cohere;
pub mod parse;

pub use cohere::{build_prompt, CohereClient};
pub use parse::{parse_songs, SONG_COUNT};

use async_trait::async_trait;

use crate::playlist::Song;

#[async_trait]
pub trait SongProvider: Send + Sync {
    /// Ask the provider for up to `SONG_COUNT` songs in `genre`.
    async fn fetch_songs(&self, genre: &str) -> Result<Vec<Song>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("Provider rejected credentials: {0}")]
    AuthFailed(String),
    #[error("Failed to parse provider response: {0}")]
    ParseFailed(String),
}
