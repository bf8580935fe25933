use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid token amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    #[error("unknown tier: {0}")]
    UnknownTier(String),
}
