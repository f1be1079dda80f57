use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.zoo.dev";

const TOKEN_VARS: [&str; 2] = ["ZOO_API_TOKEN", "ZOO_API_KEY"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no API token configured; set ZOO_API_TOKEN (or ZOO_API_KEY) in the environment or .env")]
    MissingToken,

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Bearer token for the Zoo API. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self(token))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ZooConfig {
    pub api_token: ApiToken,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ZooConfig {
    pub fn new(api_token: ApiToken) -> Self {
        Self {
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client configuration from environment-style variables.
    ///
    /// - `ZOO_API_TOKEN` (or `ZOO_API_KEY`): required
    /// - `ZOO_API_URL`: defaults to [`DEFAULT_BASE_URL`]
    /// - `CADGEN_REQUEST_TIMEOUT_SECS`: defaults to 30
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = TOKEN_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let mut config = Self::new(ApiToken::new(token)?);

        if let Some(url) = lookup("ZOO_API_URL").filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }

        if let Some(raw) = lookup("CADGEN_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CADGEN_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
