use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, CorsConfig};
use crate::playlist::PlaylistService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub playlists: Arc<PlaylistService>,
}

impl AppState {
    pub fn new(config: Config, playlists: PlaylistService) -> Self {
        Self {
            config: Arc::new(config),
            playlists: Arc::new(playlists),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(crate::playlist::home))
        // Clients post both with and without the trailing slash.
        .route("/generate_song_list/", post(crate::playlist::generate_song_list))
        .route("/generate_song_list", post(crate::playlist::generate_song_list))
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // Preflights that the CORS layer did not answer
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
