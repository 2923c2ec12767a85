//! SQL logging via `tracing`.
//!
//! [`TracedClient`] wraps any [`GenericClient`] and emits one event per
//! statement on the `jolly.sql` target: the rendered SQL (placeholders only,
//! never bound values), the parameter count, elapsed time and the outcome.

use crate::client::GenericClient;
use crate::config::Config;
use crate::error::JollyResult;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A client wrapper that logs every statement it runs.
#[derive(Debug, Clone)]
pub struct TracedClient<C> {
    client: C,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<C: GenericClient> TracedClient<C> {
    /// Wrap `client`, logging at DEBUG and truncating SQL to 200 bytes.
    pub fn new(client: C) -> Self {
        Self {
            client,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Wrap `client` using the SQL length limit from [`Config`].
    pub fn with_config(client: C, config: &Config) -> Self {
        Self {
            max_sql_length: config.log_sql_max,
            ..Self::new(client)
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn emit(&self, sql: &str, param_count: usize, elapsed: Duration, outcome: Result<usize, &str>) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.display_sql(sql);
        let elapsed_us = elapsed.as_micros() as u64;
        match outcome {
            Ok(rows) => emit_at_level!(
                self.level,
                target: "jolly.sql",
                param_count,
                elapsed_us,
                rows,
                sql = %sql,
            ),
            Err(error) => tracing::warn!(
                target: "jolly.sql",
                param_count,
                elapsed_us,
                error,
                sql = %sql,
                "statement failed"
            ),
        }
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JollyResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.client.query(sql, params).await;
        match &result {
            Ok(rows) => self.emit(sql, params.len(), start.elapsed(), Ok(rows.len())),
            Err(e) => self.emit(sql, params.len(), start.elapsed(), Err(&e.to_string())),
        }
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JollyResult<u64> {
        let start = Instant::now();
        let result = self.client.execute(sql, params).await;
        match &result {
            Ok(n) => self.emit(sql, params.len(), start.elapsed(), Ok(*n as usize)),
            Err(e) => self.emit(sql, params.len(), start.elapsed(), Err(&e.to_string())),
        }
        result
    }
}
