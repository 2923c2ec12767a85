//! Error types for jolly

use crate::changeset::ValidationErrors;
use thiserror::Error;

/// Result type alias for jolly operations
pub type JollyResult<T> = Result<T, JollyError>;

/// Error types for query building and database operations
#[derive(Debug, Error)]
pub enum JollyError {
    /// A partial update was requested with no fields
    #[error("No data")]
    EmptyInput,

    /// A lower bound filter is greater than its upper bound
    #[error("{min} must not be greater than {max}")]
    InvalidRange { min: String, max: String },

    /// Request rejected by a model operation (duplicates, bad references)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payload shape error (unknown fields, unsafe identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level validation failures
    #[error("Invalid input: {} error(s)", .0.len())]
    Invalid(ValidationErrors),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl JollyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a range error for a pair of bound fields
    pub fn invalid_range(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self::InvalidRange {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the caller sent something unusable (maps to HTTP 400).
    ///
    /// Not-found is reported separately through [`JollyError::is_not_found`].
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::InvalidRange { .. }
                | Self::BadRequest(_)
                | Self::Validation(_)
                | Self::Invalid(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JollyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<ValidationErrors> for JollyError {
    fn from(errs: ValidationErrors) -> Self {
        Self::Invalid(errs)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JollyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_reads_like_the_api_message() {
        assert_eq!(JollyError::EmptyInput.to_string(), "No data");
    }

    #[test]
    fn range_error_names_both_fields() {
        let err = JollyError::invalid_range("minEmployees", "maxEmployees");
        assert_eq!(
            err.to_string(),
            "minEmployees must not be greater than maxEmployees"
        );
    }

    #[test]
    fn builder_faults_are_client_errors() {
        assert!(JollyError::EmptyInput.is_client_error());
        assert!(JollyError::invalid_range("a", "b").is_client_error());
        assert!(JollyError::validation("bad").is_client_error());
        assert!(!JollyError::not_found("x").is_client_error());
        assert!(!JollyError::Connection("down".into()).is_client_error());
    }
}
