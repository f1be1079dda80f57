use std::env;
use std::time::Duration;

use cadgen_core::PollConfig;
use cadgen_zoo::{ConfigError, ZooConfig};

use crate::error::AppError;

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Copy, Default)]
pub struct PollOverrides {
    pub interval_secs: Option<u64>,
    pub max_polls: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub zoo: ZooConfig,
    pub poll: PollConfig,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn load(overrides: PollOverrides) -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: PollOverrides,
    ) -> Result<Self, AppError> {
        let zoo = ZooConfig::from_lookup(&lookup)?;

        let defaults = PollConfig::default();
        let interval_secs = match overrides.interval_secs {
            Some(secs) => secs,
            None => parse_var(&lookup, "CADGEN_POLL_INTERVAL_SECS")?
                .unwrap_or(defaults.interval().as_secs()),
        };
        let max_polls = match overrides.max_polls {
            Some(polls) => polls,
            None => parse_var(&lookup, "CADGEN_MAX_POLLS")?.unwrap_or(defaults.max_polls()),
        };

        let poll = PollConfig::new(Duration::from_secs(interval_secs), max_polls)?;

        Ok(Self { zoo, poll })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value: raw.clone() })
        })
        .transpose()
}
