//! Anchor history persistence errors.

use thiserror::Error;

/// Errors that can occur while saving or loading the history snapshot
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Unsupported history version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
