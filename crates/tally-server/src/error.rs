use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tally_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("voter in cooldown for another {retry_after_ms} ms")]
    Cooldown { retry_after_ms: u64 },

    #[error("rating load failed: {0}")]
    LoadFailed(#[source] LedgerError),

    #[error("vote failed: {0}")]
    VoteFailed(#[source] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] tally_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "message": "bad_request" })),
            Self::Cooldown { retry_after_ms } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "message": "cooldown", "retry_after_ms": retry_after_ms }),
            ),
            Self::LoadFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "load_failed" }),
            ),
            Self::VoteFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "vote_failed" }),
            ),
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "internal_error" }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
