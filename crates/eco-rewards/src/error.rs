use eco_ledger::LedgerError;
use eco_types::TokenAmount;
use thiserror::Error;

use crate::config::ConfigError;
use crate::sensor::SensorError;

/// Errors produced by reward operations.
///
/// Only [`RewardError::InsufficientBalance`], [`RewardError::UnknownItem`]
/// and [`RewardError::InvalidReading`] are expected in normal use; the rest
/// indicate a defect or a broken host.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("insufficient balance: item costs {cost}, balance is {balance}")]
    InsufficientBalance {
        cost: TokenAmount,
        balance: TokenAmount,
    },

    #[error("unknown catalog item: {0}")]
    UnknownItem(String),

    #[error("invalid sensor reading: {0}")]
    InvalidReading(String),

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("session lock poisoned")]
    SessionPoisoned,
}

impl RewardError {
    /// Returns `true` for failures the user caused and can recover from.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. } | Self::UnknownItem(_) | Self::InvalidReading(_)
        )
    }
}
