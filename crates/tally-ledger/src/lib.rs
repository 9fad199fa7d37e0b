//! Vote ledger for Tally.
//!
//! This crate holds the one real rule of the service: a voter may vote on an
//! item once per cooldown window, and every accepted vote moves the item's
//! rating by its direction. It provides:
//! - [`VoteLedger`] with `rating` and `apply_vote` over any [`DocumentStore`](tally_store::DocumentStore)
//! - [`Ballot`] / [`VoteOutcome`] for submitted votes and their fate
//! - [`Clock`] so cooldown behavior can be driven without waiting

pub mod ballot;
pub mod clock;
pub mod error;
pub mod ledger;

pub use ballot::{Ballot, VoteOutcome, UNKNOWN_ADDRESS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{cooldown_remaining, VoteLedger, COOLDOWN_WINDOW_MS};
