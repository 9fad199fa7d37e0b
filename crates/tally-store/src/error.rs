/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document could not be encoded or decoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure talking to a remote store.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a non-success status.
    #[error("remote store returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Stored content was not valid base64 or UTF-8.
    #[error("invalid encoding: {0}")]
    Encoding(String),

    /// The write was based on a stale revision.
    #[error("revision conflict: document changed since {expected:?}")]
    Conflict { expected: Option<String> },

    /// Backend is switched off or otherwise unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
