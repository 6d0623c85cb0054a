pub mod config;
pub mod middleware;
pub mod playlist;
pub mod provider;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application around an already-loaded configuration.
pub fn build_app(config: config::Config) -> Result<axum::Router, ServerError> {
    let api_key = config.api_key()?.to_string();
    let client = provider::CohereClient::new(&config.cohere, api_key)?;
    let playlists = playlist::PlaylistService::new(Arc::new(client));

    let state = server::AppState::new(config, playlists);
    Ok(server::build_router(state))
}

pub async fn run(config: config::Config) -> Result<(), ServerError> {
    config.validate()?;

    info!("Cohere endpoint: {}", config.cohere.endpoint);
    if config.cors.allows_any() {
        info!("CORS: any origin allowed");
    } else {
        info!("CORS: allowed origins {:?}", config.cors.allowed_origins);
    }
    if config.debug_logs {
        info!("Debug logging enabled");
    }

    let addr: SocketAddr = config
        .listen_address()
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let app = build_app(config)?;

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
