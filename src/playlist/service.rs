use std::sync::Arc;
use tracing::{info, warn};

use super::error::PlaylistError;
use super::types::Playlist;
use crate::provider::SongProvider;

pub struct PlaylistService {
    provider: Arc<dyn SongProvider>,
}

impl PlaylistService {
    pub fn new(provider: Arc<dyn SongProvider>) -> Self {
        Self { provider }
    }

    /// Generate a playlist for `genre`. The genre in the result is the
    /// caller's input as given; the provider sees it trimmed.
    pub async fn generate(&self, genre: &str) -> Result<Playlist, PlaylistError> {
        let trimmed = genre.trim();
        if trimmed.is_empty() {
            warn!("Genre is missing in request");
            return Err(PlaylistError::InvalidInput("Genre is required.".to_string()));
        }

        info!("Generating playlist for genre: {}", trimmed);

        let songs = self.provider.fetch_songs(trimmed).await.map_err(|e| {
            warn!("Error generating playlist for genre {}: {}", trimmed, e);
            PlaylistError::from(e)
        })?;

        info!(songs = songs.len(), "Generated playlist for genre: {}", trimmed);

        Ok(Playlist {
            genre: genre.to_string(),
            songs,
        })
    }
}
