use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use tally_ledger::{LedgerError, VoteOutcome};

use crate::error::{ServerError, ServerResult};
use crate::request::{client_address, VoteRequest};
use crate::response::{HealthResponse, RatingResponse, VoteResponse};
use crate::state::AppState;

/// `GET /rating/{item_id}`.
pub async fn rating_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ServerResult<Json<RatingResponse>> {
    let summary = state
        .ledger
        .rating(&item_id)
        .await
        .map_err(ServerError::LoadFailed)?;
    Ok(Json(summary.into()))
}

/// `POST /vote`.
pub async fn vote_handler(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<VoteResponse>> {
    let request = VoteRequest::parse(&body)?;
    let address = client_address(&headers, peer.map(|ConnectInfo(addr)| addr));
    let ballot = request.into_ballot(address)?;

    match state.ledger.apply_vote(&ballot).await {
        Ok(VoteOutcome::Accepted(summary)) => Ok(Json(summary.into())),
        Ok(VoteOutcome::Cooldown { retry_after_ms }) => {
            Err(ServerError::Cooldown { retry_after_ms })
        }
        Err(LedgerError::Validation(reason)) => Err(ServerError::BadRequest(reason)),
        Err(e) => Err(ServerError::VoteFailed(e)),
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
