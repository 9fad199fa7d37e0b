use serde::{Deserialize, Serialize};
use tally_types::RatingSummary;

/// Body of `GET /rating/{item_id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingResponse {
    pub rating: i64,
    pub votes: u64,
}

impl From<RatingSummary> for RatingResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            rating: summary.rating,
            votes: summary.votes,
        }
    }
}

/// Body of an accepted `POST /vote`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    pub rating: i64,
    pub votes: u64,
}

impl From<RatingSummary> for VoteResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            success: true,
            rating: summary.rating,
            votes: summary.votes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
