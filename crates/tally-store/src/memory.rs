use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tally_types::LedgerDocument;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, StoredDocument};

/// In-memory document store.
///
/// Intended for tests and embedding. The document is held behind a `RwLock`
/// together with a generation counter that serves as the revision token.
/// Loads and saves can be switched off to exercise failure paths.
pub struct InMemoryDocumentStore {
    inner: RwLock<MemoryState>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    document: LedgerDocument,
    generation: u64,
}

impl InMemoryDocumentStore {
    /// Create a store holding an empty document.
    pub fn new() -> Self {
        Self::with_document(LedgerDocument::new())
    }

    /// Create a store seeded with `document`.
    pub fn with_document(document: LedgerDocument) -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                document,
                generation: 0,
            }),
            fail_loads: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Snapshot of the stored document.
    pub fn document(&self) -> LedgerDocument {
        self.inner.read().expect("lock poisoned").document.clone()
    }

    /// Number of successful saves so far.
    pub fn generation(&self) -> u64 {
        self.inner.read().expect("lock poisoned").generation
    }

    /// Make every subsequent `load` fail until switched back.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save` fail until switched back.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self) -> StoreResult<StoredDocument> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("loads disabled".into()));
        }
        let state = self.inner.read().expect("lock poisoned");
        Ok(StoredDocument::new(
            state.document.clone(),
            Some(state.generation.to_string()),
        ))
    }

    async fn save(
        &self,
        document: &LedgerDocument,
        revision: Option<&str>,
        _message: &str,
    ) -> StoreResult<Option<String>> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves disabled".into()));
        }
        let mut state = self.inner.write().expect("lock poisoned");
        let current = state.generation.to_string();
        if let Some(expected) = revision {
            if expected != current {
                return Err(StoreError::Conflict {
                    expected: Some(expected.to_owned()),
                });
            }
        }
        state.document = document.clone();
        state.generation += 1;
        Ok(Some(state.generation.to_string()))
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryDocumentStore")
            .field("item_count", &state.document.item_count())
            .field("generation", &state.generation)
            .finish()
    }
}
