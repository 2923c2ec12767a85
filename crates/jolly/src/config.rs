//! Runtime configuration read from the environment (and `.env`, if present).

use crate::error::{JollyError, JollyResult};

const DEFAULT_DATABASE_URL: &str = "postgresql:///jolly";
const DEFAULT_TEST_DATABASE_URL: &str = "postgresql:///jolly_test";

/// Connection and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub pool_size: usize,
    /// Truncate logged SQL to this many bytes. `None` logs it whole.
    pub log_sql_max: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: 16,
            log_sql_max: Some(200),
        }
    }
}

impl Config {
    /// Load `.env` (missing file is fine) and read the process environment.
    ///
    /// - `JOLLY_ENV=test` selects `DATABASE_URL_TEST` instead of `DATABASE_URL`
    /// - `JOLLY_POOL_SIZE` (default 16)
    /// - `JOLLY_LOG_SQL_MAX` (default 200, `0` disables truncation)
    pub fn from_env() -> JollyResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> JollyResult<Self> {
        let testing = get("JOLLY_ENV").is_some_and(|env| env == "test");
        let database_url = if testing {
            get("DATABASE_URL_TEST").unwrap_or_else(|| DEFAULT_TEST_DATABASE_URL.to_string())
        } else {
            get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
        };

        let defaults = Self::default();
        let pool_size = match get("JOLLY_POOL_SIZE") {
            Some(raw) => parse_number("JOLLY_POOL_SIZE", &raw)?,
            None => defaults.pool_size,
        };
        if pool_size == 0 {
            return Err(JollyError::Config("JOLLY_POOL_SIZE must be at least 1".into()));
        }

        let log_sql_max = match get("JOLLY_LOG_SQL_MAX") {
            Some(raw) => Some(parse_number("JOLLY_LOG_SQL_MAX", &raw)?).filter(|n| *n > 0),
            None => defaults.log_sql_max,
        };

        Ok(Self {
            database_url,
            pool_size,
            log_sql_max,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> JollyResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| JollyError::Config(format!("{key} must be a number, got {raw:?}")))
}
