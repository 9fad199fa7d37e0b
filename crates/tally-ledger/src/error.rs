use tally_store::StoreError;
use tally_types::TypeError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ballot is malformed. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The document could not be loaded or saved. Nothing was recorded.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<TypeError> for LedgerError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
