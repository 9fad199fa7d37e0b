use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tally_types::LedgerDocument;
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, StoredDocument};

/// Document store backed by a JSON file on local disk.
///
/// A missing file reads as an empty document. Saves write a sibling temp file
/// and rename it over the target, so readers never observe a partial write.
/// Local files carry no revision token.
#[derive(Clone, Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self) -> StoreResult<StoredDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let document = LedgerDocument::from_json(&bytes)?;
                tracing::debug!(path = %self.path.display(), items = document.item_count(), "loaded document");
                Ok(StoredDocument::new(document, None))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no document on disk, starting empty");
                Ok(StoredDocument::default())
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "document load failed");
                Err(e.into())
            }
        }
    }

    async fn save(
        &self,
        document: &LedgerDocument,
        _revision: Option<&str>,
        message: &str,
    ) -> StoreResult<Option<String>> {
        let contents = document.to_json_pretty()?;
        let path = self.path.clone();

        let result = tokio::task::spawn_blocking(move || write_atomic(&path, contents.as_bytes()))
            .await
            .map_err(|e| StoreError::Unavailable(format!("writer task failed: {e}")))?;

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), commit = message, "saved document");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "document save failed");
                Err(e.into())
            }
        }
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::{VoteDirection, VoteRecord, VoterIdentity};

    fn sample_document() -> LedgerDocument {
        let mut doc = LedgerDocument::new();
        doc.item_mut("a").record(VoteRecord::new(
            VoteDirection::Up,
            VoterIdentity::new("u1", "agent1").unwrap(),
            "127.0.0.1",
            1_700_000_000_000,
        ));
        doc
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("votes.json"));
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.document.item_count(), 0);
        assert!(loaded.revision.is_none());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("votes.json"));
        let doc = sample_document();

        assert_eq!(store.save(&doc, None, "vote: a (1)").await.unwrap(), None);
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.document, doc);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("votes.json");
        let store = FileDocumentStore::new(&path);
        store.save(&sample_document(), None, "m").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn written_file_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let store = FileDocumentStore::new(&path);
        store.save(&sample_document(), None, "m").await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"items\""));
        assert!(text.contains("\"ts\": 1700000000000"));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FileDocumentStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn describe_names_path() {
        let store = FileDocumentStore::new("votes.json");
        assert_eq!(store.describe(), "file:votes.json");
    }
}
