use std::time::Duration;

use url::Url;

/// Environment variable holding the classifier endpoint base URL.
pub const BASE_URL_ENV: &str = "CLASSIFIER_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const PREDICT_PATH: &str = "predict";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid endpoint base url {value:?}: {message}")]
    InvalidBaseUrl { value: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: Url,
    /// No connect timeout unless set.
    pub connect_timeout: Option<Duration>,
    /// No overall request timeout unless set.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base url");
        Self::new(base_url)
    }
}

impl ClientSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: 1024 * 1024,
        }
    }

    /// Reads the base URL from `CLASSIFIER_BASE_URL`, falling back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(BASE_URL_ENV) {
            Some(raw) if !raw.trim().is_empty() => parse_base_url(raw.trim()).map(Self::new),
            _ => Ok(Self::default()),
        }
    }

    /// `{base_url}/predict`, keeping any path prefix of the base URL.
    pub fn predict_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidBaseUrl {
                value: self.base_url.to_string(),
                message: "url cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(PREDICT_PATH);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        message: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
            message: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
