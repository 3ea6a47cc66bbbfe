use crate::constants::*;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("virtual user count must be at least 1")]
    ZeroVirtualUsers,

    #[error("invalid duration in {var}: {source}")]
    InvalidDuration {
        var: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("invalid integer in {var}: {source}")]
    InvalidInteger {
        var: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Configuration for a single load-test run.
///
/// Immutable once a run starts: the runner takes it by value and never
/// writes back to it.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub virtual_users: usize,
    pub duration: Duration,
    pub base_url: String,
    pub api_key: Option<String>,
    pub pause: Duration,
    pub request_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            virtual_users: DEFAULT_VIRTUAL_USERS,
            duration: DEFAULT_DURATION,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            pause: DEFAULT_PAUSE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment: `BASE_URL`, `API_KEY`,
    /// `VIRTUAL_USERS`, `DURATION`, `PAUSE`, `REQUEST_TIMEOUT`. Durations
    /// accept humantime syntax (`30s`, `500ms`). An empty `API_KEY` counts
    /// as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }

        if let Ok(api_key) = env::var("API_KEY") {
            if !api_key.is_empty() {
                config.api_key = Some(api_key);
            }
        }

        if let Ok(users) = env::var("VIRTUAL_USERS") {
            config.virtual_users = users
                .parse()
                .map_err(|source| ConfigError::InvalidInteger {
                    var: "VIRTUAL_USERS",
                    source,
                })?;
        }

        if let Ok(duration) = env::var("DURATION") {
            config.duration = parse_duration("DURATION", &duration)?;
        }

        if let Ok(pause) = env::var("PAUSE") {
            config.pause = parse_duration("PAUSE", &pause)?;
        }

        if let Ok(timeout) = env::var("REQUEST_TIMEOUT") {
            config.request_timeout = parse_duration("REQUEST_TIMEOUT", &timeout)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn virtual_users(mut self, virtual_users: usize) -> Self {
        self.virtual_users = virtual_users;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.virtual_users == 0 {
            return Err(ConfigError::ZeroVirtualUsers);
        }
        Ok(())
    }

    /// Full URL each request targets.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TARGET_PATH)
    }
}

fn parse_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value)
        .map_err(|source| ConfigError::InvalidDuration { var, source })
}
