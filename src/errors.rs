use rust_decimal::Decimal;
use thiserror::Error;

use crate::format::format_money;

/// Result alias used by every fallible ledger operation.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Contract violation: {0}")]
    Contract(String),
    #[error("Check #{0} already written")]
    DuplicateCheck(u32),
    #[error("Insufficient funds. Available: {}", money(.available))]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn money(amount: &Decimal) -> String {
    format_money(*amount)
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub(crate) fn contract(message: impl Into<String>) -> Self {
        LedgerError::Contract(message.into())
    }
}
