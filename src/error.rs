//! Error types for the guest store.
//!
//! Callers of the boolean API never see these; they are the detail behind
//! the `try_*` variants and what gets logged when an operation reports `false`.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid guest: {0}")]
    InvalidGuest(String),

    #[error("cannot downgrade schema from version {stored} to {requested}")]
    Downgrade { stored: u32, requested: u32 },

    #[error("schema version must be at least 1, got {0}")]
    InvalidVersion(u32),

    #[error("cannot decode column `{column}`: {reason}")]
    Decode { column: String, reason: String },
}

impl StoreError {
    pub(crate) fn decode(column: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
