use std::net::SocketAddr;

use axum::http::HeaderMap;
use serde_json::{Map, Value};
use tally_ledger::{Ballot, UNKNOWN_ADDRESS};
use tally_types::{VoteDirection, VoterIdentity};

use crate::error::{ServerError, ServerResult};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// A decoded `POST /vote` body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRequest {
    pub item_id: String,
    pub direction: VoteDirection,
    pub voter: VoterIdentity,
}

impl VoteRequest {
    /// Decode and validate a raw request body.
    ///
    /// Every field is required and must be a non-empty string, except `vote`
    /// which must be exactly `1` or `-1`.
    pub fn parse(body: &[u8]) -> ServerResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| ServerError::BadRequest("body is not an object".into()))?;

        let item_id = required_string(object, "item_id")?;
        let direction = object
            .get("vote")
            .and_then(parse_direction)
            .ok_or_else(|| ServerError::BadRequest("vote must be 1 or -1".into()))?;
        let user_hash = required_string(object, "user_hash")?;
        let user_agent = required_string(object, "user_agent")?;

        let voter = VoterIdentity::new(user_hash, user_agent)
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        Ok(Self {
            item_id,
            direction,
            voter,
        })
    }

    pub fn into_ballot(self, source_address: String) -> ServerResult<Ballot> {
        Ballot::new(self.item_id, self.direction, self.voter, source_address)
            .map_err(|e| ServerError::BadRequest(e.to_string()))
    }
}

fn required_string(object: &Map<String, Value>, key: &str) -> ServerResult<String> {
    match object.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_owned()),
        _ => Err(ServerError::BadRequest(format!("missing {key}"))),
    }
}

fn parse_direction(value: &Value) -> Option<VoteDirection> {
    if let Some(n) = value.as_i64() {
        return VoteDirection::try_from(n).ok();
    }
    match value.as_f64() {
        Some(f) if f == 1.0 => Some(VoteDirection::Up),
        Some(f) if f == -1.0 => Some(VoteDirection::Down),
        _ => None,
    }
}

/// Best-effort client address.
///
/// Prefers the first entry of `X-Forwarded-For`, then the peer address of the
/// connection, then `"unknown"`.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => addr.to_owned(),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => UNKNOWN_ADDRESS.to_owned(),
    }
}
