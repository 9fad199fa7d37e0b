use async_trait::async_trait;
use tally_types::LedgerDocument;

use crate::error::StoreResult;

/// A loaded document plus the revision it was read at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredDocument {
    pub document: LedgerDocument,
    /// Opaque store-issued version. `None` for backends without versioning.
    pub revision: Option<String>,
}

impl StoredDocument {
    pub fn new(document: LedgerDocument, revision: Option<String>) -> Self {
        Self { document, revision }
    }
}

/// Whole-document storage for the vote ledger.
///
/// All implementations must satisfy these invariants:
/// - `load` always returns the latest persisted document; nothing is cached.
/// - `save` replaces the entire document or fails without partial writes.
/// - When `revision` is given and the backend tracks revisions, a save against
///   a stale revision fails with [`StoreError::Conflict`](crate::StoreError::Conflict).
/// - All I/O errors are propagated, never retried.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current document.
    async fn load(&self) -> StoreResult<StoredDocument>;

    /// Replace the document and return the new revision, if any.
    ///
    /// `message` describes the change for backends that keep a history.
    async fn save(
        &self,
        document: &LedgerDocument,
        revision: Option<&str>,
        message: &str,
    ) -> StoreResult<Option<String>>;

    /// Short human-readable description of where the document lives.
    fn describe(&self) -> String;
}
