use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub cohere: CohereConfig,
    #[serde(default = "default_logfile")]
    pub logfile: String,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(alias = "allowedorigins", default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    /// True only for an explicit `*`. An empty list denies every
    /// cross-origin caller.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct CohereConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(alias = "maxtokens", default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(alias = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CohereConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keep the credential out of debug logs.
impl fmt::Debug for CohereConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CohereConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_port() -> String {
    "8000".to_string()
}

fn default_logfile() -> String {
    "stdout".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_endpoint() -> String {
    "https://api.cohere.ai/generate".to_string()
}

fn default_model() -> String {
    "command".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            cors: CorsConfig::default(),
            cohere: CohereConfig::default(),
            logfile: default_logfile(),
            debug_logs: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Load the optional config file, apply the process environment on top
    /// and validate the result.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override file settings with environment values. `lookup` is
    /// `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("COHERE_API_KEY") {
            self.cohere.api_key = Some(key);
        }
        if let Some(endpoint) = lookup("COHERE_ENDPOINT") {
            self.cohere.endpoint = endpoint;
        }
        if let Some(port) = lookup("PORT") {
            self.listen.port = port;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = parse_origins(&origins);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;

        if self.listen.port.trim().parse::<u16>().is_err() {
            return Err(ConfigError::InvalidPort(self.listen.port.clone()));
        }

        if self.cohere.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if !self.cors.allows_any() {
            for origin in &self.cors.allowed_origins {
                if axum::http::HeaderValue::from_str(origin).is_err() {
                    return Err(ConfigError::InvalidOrigin(origin.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.cohere.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn listen_address(&self) -> String {
        let address = self.listen.address.as_deref().unwrap_or("0.0.0.0");
        format!("{}:{}", address, self.listen.port.trim())
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("COHERE_API_KEY is not set in the environment variables")]
    MissingApiKey,
    #[error("Invalid listen port: {0}")]
    InvalidPort(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),
    #[error("cohere.timeout_secs must be greater than zero")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen.port, "8000");
        assert_eq!(config.listen_address(), "0.0.0.0:8000");
        assert!(config.cors.allows_any());
        assert_eq!(config.cohere.endpoint, "https://api.cohere.ai/generate");
        assert_eq!(config.cohere.model, "command");
        assert_eq!(config.cohere.max_tokens, 100);
        assert_eq!(config.logfile, "stdout");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let mut config = Config::default();
        config.apply_env(env(&[("COHERE_API_KEY", "   ")]));
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("COHERE_API_KEY", "secret"),
            ("PORT", "9001"),
            ("ALLOWED_ORIGINS", "http://localhost:5173, https://example.com/ ,"),
        ]));

        assert!(config.validate().is_ok());
        assert_eq!(config.api_key().unwrap(), "secret");
        assert_eq!(config.listen_address(), "0.0.0.0:9001");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "https://example.com"]
        );
        assert!(!config.cors.allows_any());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = Config::default();
        config.apply_env(env(&[("COHERE_API_KEY", "k"), ("PORT", "eighty")]));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_empty_origins_deny_all() {
        for value in ["", " , ", ","] {
            let mut config = Config::default();
            config.apply_env(env(&[("COHERE_API_KEY", "k"), ("ALLOWED_ORIGINS", value)]));
            assert!(config.cors.allowed_origins.is_empty());
            assert!(!config.cors.allows_any());
            assert!(config.validate().is_ok());
        }

        let mut config = Config::default();
        config.apply_env(env(&[("ALLOWED_ORIGINS", "*")]));
        assert!(config.cors.allows_any());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.cohere.api_key = Some("k".to_string());
        config.cohere.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_from_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen:\n  address: 127.0.0.1\n  port: \"8080\"\ncors:\n  allowed_origins: [\"http://app.local\"]\ncohere:\n  api_key: from-file\n  timeout_secs: 5\n"
        )
        .unwrap();

        let mut config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert_eq!(config.cohere.timeout_secs, 5);
        assert_eq!(config.cohere.model, "command");

        config.apply_env(env(&[("COHERE_API_KEY", "from-env")]));
        assert_eq!(config.api_key().unwrap(), "from-env");
        assert_eq!(config.cors.allowed_origins, vec!["http://app.local"]);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.cohere.api_key = Some("super-secret".to_string());
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
