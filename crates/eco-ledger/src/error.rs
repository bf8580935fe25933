/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("entry payload could not be canonically encoded: {0}")]
    Encoding(String),

    #[error("ledger export could not be decoded: {0}")]
    Decoding(String),

    #[error("a ledger needs at least a genesis entry")]
    Empty,
}
