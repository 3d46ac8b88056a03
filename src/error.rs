//! Error types for ddb-walker
//!
//! This module defines the error hierarchy that covers:
//! - Store (DynamoDB) request errors
//! - Per-field parse failures while mapping raw records
//! - Configuration and CLI errors
//!
//! Store and config errors propagate with `?`. Field parse errors never leave
//! the pipeline: the reconciler logs them and drops the offending record.

use thiserror::Error;

/// Top-level error type for the ddb-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The background scan task panicked or was aborted
    #[error("Scan task failed: {0}")]
    TaskFailed(String),
}

/// Errors raised by a [`TableScan`](crate::store::TableScan) backend
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// A page request failed
    #[error("Failed to scan table '{table}': {reason}")]
    ScanFailed { table: String, reason: String },

    /// Backend could not be set up
    #[error("Store configuration error: {0}")]
    Config(String),
}

/// A required sub-field of a raw record failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldParseError {
    /// Owner id is not a base-10 32-bit integer
    #[error("Invalid user id in '{field}': '{value}'")]
    InvalidOwner { field: &'static str, value: String },

    /// Collection id is not a UUID
    #[error("Invalid collection id in '{field}': '{value}'")]
    InvalidCollectionId { field: &'static str, value: String },

    /// Timestamp is not RFC3339
    #[error("Invalid timestamp in '{field}': '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Composite key does not look like `<owner>-<collection>`
    #[error("Malformed composite key in '{field}': '{value}'")]
    MalformedCompositeKey { field: &'static str, value: String },
}

impl FieldParseError {
    /// Name of the record field that failed to parse
    pub fn field(&self) -> &'static str {
        match self {
            FieldParseError::InvalidOwner { field, .. }
            | FieldParseError::InvalidCollectionId { field, .. }
            | FieldParseError::InvalidTimestamp { field, .. }
            | FieldParseError::MalformedCompositeKey { field, .. } => *field,
        }
    }

    /// Raw value that failed to parse
    pub fn value(&self) -> &str {
        match self {
            FieldParseError::InvalidOwner { value, .. }
            | FieldParseError::InvalidCollectionId { value, .. }
            | FieldParseError::InvalidTimestamp { value, .. }
            | FieldParseError::MalformedCompositeKey { value, .. } => value,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Table name missing
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// Page limit out of range
    #[error("Invalid page limit {limit}: must be positive, or -1 for the store default")]
    InvalidPageLimit { limit: i32 },

    /// Channel capacity out of range
    #[error("Invalid channel capacity {capacity}: must be between {min} and {max}")]
    InvalidChannelCapacity {
        capacity: usize,
        min: usize,
        max: usize,
    },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for FieldParseError
pub type ParseResult<T> = std::result::Result<T, FieldParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_error_accessors() {
        let err = FieldParseError::InvalidOwner {
            field: "userAndCollection",
            value: "abc".into(),
        };
        assert_eq!(err.field(), "userAndCollection");
        assert_eq!(err.value(), "abc");
        assert_eq!(err.to_string(), "Invalid user id in 'userAndCollection': 'abc'");
    }

    #[test]
    fn test_error_conversion() {
        let store_err = StoreError::ScanFailed {
            table: "t".into(),
            reason: "throttled".into(),
        };
        let walker_err: WalkerError = store_err.into();
        assert!(matches!(walker_err, WalkerError::Store(_)));

        let walker_err: WalkerError = ConfigError::EmptyTableName.into();
        assert!(matches!(walker_err, WalkerError::Config(_)));
    }
}
