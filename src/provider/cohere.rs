use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{parse_songs, ProviderError, SongProvider, SONG_COUNT};
use crate::config::CohereConfig;
use crate::playlist::Song;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
}

// Older deployments answer with a top-level `text`, the v1 API with
// `generations[].text`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.text
            .or_else(|| self.generations.into_iter().next().map(|g| g.text))
    }
}

pub fn build_prompt(genre: &str) -> String {
    format!(
        "Suggest {} {} songs with their artists. \
         Put each song on its own line in the format: Title - Artist. \
         Do not add any other text.",
        SONG_COUNT, genre
    )
}

/// Client for the Cohere generate endpoint.
pub struct CohereClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl CohereClient {
    pub fn new(config: &CohereConfig, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(status = status.as_u16(), body = %body, "Cohere API rejected credentials");
            return Err(ProviderError::AuthFailed(format!("HTTP {}", status)));
        }

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Invalid response from Cohere API");
            return Err(ProviderError::Unavailable(format!("HTTP {}", status)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(body = %body, "Cohere API returned a body that is not a generate response");
            ProviderError::ParseFailed(e.to_string())
        })?;

        parsed
            .into_text()
            .ok_or_else(|| ProviderError::ParseFailed("response has no completion text".to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        warn!("Cohere API request timed out");
        ProviderError::Unavailable("request timed out".to_string())
    } else {
        warn!("Cohere API request failed: {}", err);
        ProviderError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl SongProvider for CohereClient {
    async fn fetch_songs(&self, genre: &str) -> Result<Vec<Song>, ProviderError> {
        let text = self.generate(build_prompt(genre)).await?;
        debug!(genre = genre, text = %text, "Cohere completion");

        let songs = parse_songs(&text);
        if songs.is_empty() {
            warn!("No songs could be parsed for genre: {}", genre);
            return Err(ProviderError::ParseFailed(
                "no 'Title - Artist' lines in completion".to_string(),
            ));
        }

        Ok(songs)
    }
}
