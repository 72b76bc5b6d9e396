#![forbid(unsafe_code)]

//! Common error type for Timelock crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelockError {
    /// I/O related failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsing failures.
    #[error("Config parse error: {0}")]
    ConfigParse(toml::de::Error),

    /// Configuration parsed but holds values the protocol cannot use.
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    /// JSON encode/decode errors for persisted moduli, puzzles and proofs.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenient alias for results throughout Timelock crates.
pub type TimelockResult<T> = Result<T, TimelockError>;
