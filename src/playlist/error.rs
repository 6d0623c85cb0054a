use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorBody;
use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Song provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Song provider rejected the configured credentials")]
    ProviderAuthFailed,
    #[error("No songs could be read from the provider response: {0}")]
    ProviderParseFailed(String),
}

impl PlaylistError {
    pub fn kind(&self) -> &'static str {
        match self {
            PlaylistError::InvalidInput(_) => "invalid_input",
            PlaylistError::ProviderUnavailable(_) => "provider_unavailable",
            PlaylistError::ProviderAuthFailed => "provider_auth_failed",
            PlaylistError::ProviderParseFailed(_) => "provider_parse_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PlaylistError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlaylistError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlaylistError::ProviderAuthFailed => StatusCode::BAD_GATEWAY,
            PlaylistError::ProviderParseFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ProviderError> for PlaylistError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => PlaylistError::ProviderUnavailable(msg),
            // The provider's message may echo request details; keep it in the logs only.
            ProviderError::AuthFailed(_) => PlaylistError::ProviderAuthFailed,
            ProviderError::ParseFailed(msg) => PlaylistError::ProviderParseFailed(msg),
        }
    }
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind().to_string(),
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        let err: PlaylistError = ProviderError::Unavailable("timed out".into()).into();
        assert_eq!(err.kind(), "provider_unavailable");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: PlaylistError = ProviderError::AuthFailed("invalid api token".into()).into();
        assert_eq!(err.kind(), "provider_auth_failed");
        assert!(err.status_code().is_server_error());
        assert!(!err.to_string().contains("invalid api token"));

        let err: PlaylistError = ProviderError::ParseFailed("no songs".into()).into();
        assert_eq!(err.kind(), "provider_parse_failed");
        assert!(err.status_code().is_server_error());
    }

    #[test]
    fn test_invalid_input_is_client_error() {
        let err = PlaylistError::InvalidInput("Genre is required.".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Genre is required.");
    }
}
