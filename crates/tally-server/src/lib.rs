//! HTTP server for Tally.
//!
//! Exposes the vote ledger as a small JSON API:
//!
//! - `GET /rating/{item_id}` -- current rating and vote count
//! - `POST /vote` -- submit a +1/-1 vote, subject to the voter cooldown
//! - `GET /health` -- liveness probe

pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StoreConfig};
pub use error::{ServerError, ServerResult};
pub use request::{client_address, VoteRequest};
pub use response::{HealthResponse, RatingResponse, VoteResponse};
pub use server::TallyServer;
pub use state::AppState;
