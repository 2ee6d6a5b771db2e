//! Configuration validation errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Config could not be parsed: {0}")]
    Parse(String),

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is too large to represent as a duration (got {value})")]
    DurationOverflow { field: &'static str, value: f64 },

    #[error("history.storage_limit must be at least 1")]
    ZeroStorageLimit,

    #[error("{0} must not be empty")]
    EmptyKey(&'static str),
}
