//! Typed error hierarchy for bangbang.
//!
//! Three top-level enums cover the three subsystems:
//! - `SyncError`: replace-order and board-read failures seen by the sync client
//! - `StoreError`: validation and persistence failures inside the board authority
//! - `ConfigError`: invalid configuration values

use thiserror::Error;

/// Errors from the sync client talking to the remote authority.
///
/// Every variant is handled the same way by the default recovery policy
/// (discard local state, reload the board), but they stay distinct so the
/// diagnostic says what actually went wrong.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Remote authority rejected {endpoint} with status {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{kind} order needs a column id")]
    MissingScope { kind: crate::board::EndpointKind },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the authoritative board store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Column {id} not found")]
    ColumnNotFound { id: String },

    #[error("Card {id} not found")]
    CardNotFound { id: String },

    #[error("Duplicate id {id} in order request")]
    DuplicateId { id: String },

    #[error("Column order names {given} of {expected} columns")]
    IncompleteColumnOrder { given: usize, expected: usize },

    #[error("Card {card} would be orphaned from column {column}")]
    OrphanedCard { card: String, column: String },

    #[error("Invalid board file: {0}")]
    FrontMatter(String),

    #[error("Failed to parse board front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Board file I/O failed at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Board store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether the error was caused by the submitted order rather than the store itself.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::CardNotFound { .. }
                | Self::DuplicateId { .. }
                | Self::IncompleteColumnOrder { .. }
                | Self::OrphanedCard { .. }
        )
    }
}

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("swap_threshold must be in (0, 1], got {0}")]
    SwapThreshold(f64),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("max_swipe_ms must be greater than zero")]
    ZeroSwipeWindow,
}
