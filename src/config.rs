// Client configuration: where the booking service lives and how long to wait for it

use crate::client::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://restful-booker.herokuapp.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const BASE_URL_ENV: &str = "BOOKING_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "BOOKING_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("booking-api-tests/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Unset variables fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = trim_base_url(base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                ClientError::ConfigError(format!("{} is not a number of milliseconds: {}", TIMEOUT_ENV, raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.is_empty() {
            return Err(ClientError::ConfigError("base_url is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn booking_url(&self) -> String {
        format!("{}/booking", self.base_url.trim_end_matches('/'))
    }
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
