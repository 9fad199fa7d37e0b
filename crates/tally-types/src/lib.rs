//! Foundation types for Tally.
//!
//! This crate provides the data model shared by every other Tally crate. The
//! whole state of the service is one [`LedgerDocument`], serialized as JSON by
//! whichever document store backs the deployment.
//!
//! # Key Types
//!
//! - [`VoteDirection`] -- a single up (+1) or down (-1) vote
//! - [`VoterIdentity`] -- the `(user_hash, user_agent)` pair that recognizes a repeat voter
//! - [`VoteRecord`] -- one accepted vote, immutable once appended
//! - [`ItemAggregate`] -- running rating, vote count, and history for one item
//! - [`LedgerDocument`] -- every item aggregate, keyed by item id
//! - [`RatingSummary`] -- the `{rating, votes}` pair returned to callers

pub mod aggregate;
pub mod document;
pub mod error;
pub mod vote;

pub use aggregate::{ItemAggregate, RatingSummary};
pub use document::{LedgerDocument, Violation, ViolationKind};
pub use error::TypeError;
pub use vote::{VoteDirection, VoteRecord, VoterIdentity};
