//! Client configuration.
//!
//! The base URL is validated once here so request building never has to. A
//! trailing slash is stripped so joined paths never contain `//`.

use url::Url;

use crate::error::ConfigError;

/// Public API endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";

pub const DEFAULT_USER_AGENT: &str = concat!("cdnconf/", env!("CARGO_PKG_VERSION"));

/// Overrides the base URL in `ClientConfig::from_env`.
pub const API_URL_ENV: &str = "CDNCONF_API_URL";

/// Overrides the user agent in `ClientConfig::from_env`.
pub const USER_AGENT_ENV: &str = "CDNCONF_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: base_url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }
        Ok(Self {
            base_url: base_url.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Build a config from `CDNCONF_API_URL` and `CDNCONF_USER_AGENT`,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let config = Self::new(base_url.trim())?;
        Ok(match lookup(USER_AGENT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(agent) => config.with_user_agent(agent),
            None => config,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
