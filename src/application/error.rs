use thiserror::Error;

use crate::domain::ValidationError;
use crate::storage::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input to account or transaction construction. Returned before
    /// any write is attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// A ledger write failed; see `LedgerError` for whether the aggregates
    /// were left consistent.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
