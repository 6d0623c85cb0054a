use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::warn;

use super::error::PlaylistError;
use super::types::{GenreRequest, Playlist, StatusMessage};
use crate::server::AppState;

pub async fn generate_song_list(
    State(state): State<AppState>,
    payload: Result<Json<GenreRequest>, JsonRejection>,
) -> Result<Json<Playlist>, PlaylistError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected request body: {}", e.body_text());
        PlaylistError::InvalidInput(e.body_text())
    })?;

    let playlist = state.playlists.generate(&req.genre).await?;

    Ok(Json(playlist))
}

pub async fn home() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Music Playlist Generator API is running!".to_string(),
    })
}
