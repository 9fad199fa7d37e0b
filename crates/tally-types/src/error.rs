use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid vote direction: {0} (expected 1 or -1)")]
    InvalidDirection(i64),

    #[error("empty field: {0}")]
    EmptyField(&'static str),
}
