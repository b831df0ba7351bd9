use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::review::RetryPolicy;

/// Deployment environment, read from `ENVIRONMENT`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid environment: {0}")]
    Env(#[from] envy::Error),
    #[error("JWT_SECRET must be at least 32 characters")]
    JwtSecretTooShort,
    #[error("REVIEW_PERSIST_ATTEMPTS must be at least 1")]
    NoPersistAttempts,
    #[error("REVIEW_RETRY_BACKOFF_MS must be at most {MAX_RETRY_BACKOFF_MS}")]
    RetryBackoffTooLong,
    #[error("STUDY_SESSION_IDLE_MINUTES must be between 1 and {MAX_SESSION_IDLE_MINUTES}")]
    SessionIdleMinutesOutOfRange,
}

const MIN_JWT_SECRET_LEN: usize = 32;
const MAX_RETRY_BACKOFF_MS: u64 = 60_000;
/// One week
const MAX_SESSION_IDLE_MINUTES: i64 = 7 * 24 * 60;

/// Server configuration, deserialized from environment variables.
///
/// Field names map to upper-case variables, e.g. `database_url` is read from
/// `DATABASE_URL`. Only `DATABASE_URL` and `JWT_SECRET` are required.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default, rename = "environment")]
    pub env: Environment,
    /// Comma separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// How many times a review write is tried before the learner is warned
    #[serde(default = "default_review_persist_attempts")]
    pub review_persist_attempts: u32,
    #[serde(default = "default_review_retry_backoff_ms")]
    pub review_retry_backoff_ms: u64,
    /// Study sessions untouched for this long are dropped
    #[serde(default = "default_study_session_idle_minutes")]
    pub study_session_idle_minutes: i64,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_allowed_origins() -> String {
    "http://localhost:5173".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_review_persist_attempts() -> u32 {
    3
}

const fn default_review_retry_backoff_ms() -> u64 {
    200
}

const fn default_study_session_idle_minutes() -> i64 {
    60
}

const fn default_metrics_enabled() -> bool {
    true
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::from_env::<Self>()?.validated()
    }

    /// Build a config from explicit key/value pairs (upper-case keys, like the environment).
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars)?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::JwtSecretTooShort);
        }
        if self.review_persist_attempts == 0 {
            return Err(ConfigError::NoPersistAttempts);
        }
        if self.review_retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(ConfigError::RetryBackoffTooLong);
        }
        if !(1..=MAX_SESSION_IDLE_MINUTES).contains(&self.study_session_idle_minutes) {
            return Err(ConfigError::SessionIdleMinutesOutOfRange);
        }
        Ok(self)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.review_persist_attempts,
            backoff: Duration::from_millis(self.review_retry_backoff_ms),
        }
    }
}
