//! Document storage for Tally.
//!
//! The vote ledger keeps its entire state in one JSON document. This crate
//! moves that document in and out of durable storage; it never interprets
//! votes itself.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- lock-guarded store for tests and embedding
//! - [`FileDocumentStore`] -- JSON file on local disk, replaced atomically
//! - [`GithubDocumentStore`] -- file in a GitHub repository via the contents API
//!
//! # Design Rules
//!
//! 1. Every load reads the backing store; nothing is cached between calls.
//! 2. Every save replaces the whole document or fails with nothing written.
//! 3. Backends with revisions reject writes based on a stale revision.
//! 4. All I/O errors are propagated, never retried.

pub mod error;
pub mod file;
pub mod github;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileDocumentStore;
pub use github::{GithubDocumentStore, GithubLocation, DEFAULT_API_BASE};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentStore, StoredDocument};
