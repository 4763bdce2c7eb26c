use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::registry::BlockListRegistry;
use crate::store::BlockListStore;

/// File-backed store. The registry lives in a single JSON object,
/// pretty-printed with 4-space indentation, unicode identities verbatim.
/// Writes go to a sibling temp file and are renamed into place, so readers
/// never observe a partial rewrite even across processes.
#[derive(Debug, Clone)]
pub struct JsonFileBlockListStore {
    path: Arc<PathBuf>,
    // shared across clones: one lock domain per backing file
    lock: Arc<Mutex<()>>,
}

impl JsonFileBlockListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // callers hold `lock`
    async fn read_registry(&self) -> Result<BlockListRegistry, StoreError> {
        let bytes = match tokio::fs::read(self.path.as_ref()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(BlockListRegistry::default())
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    // callers hold `lock`
    async fn write_registry(&self, registry: &BlockListRegistry) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        registry.serialize(&mut serializer)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &buf).await?;
        tokio::fs::rename(&tmp, self.path.as_ref()).await?;
        Ok(())
    }
}

#[async_trait]
impl BlockListStore for JsonFileBlockListStore {
    async fn load(&self) -> Result<BlockListRegistry, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_registry().await
    }

    async fn save(&self, registry: &BlockListRegistry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write_registry(registry).await
    }

    async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BlockListRegistry) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut registry = match self.read_registry().await {
            Ok(registry) => registry,
            Err(e) => {
                warn!("ignore registry unreadable, rewriting from empty: {e}");
                BlockListRegistry::default()
            }
        };
        let result = mutate(&mut registry);
        self.write_registry(&registry).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileBlockListStore {
        JsonFileBlockListStore::new(dir.path().join("ignores.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        let registry = store.load().await.expect("load");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn save_load_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        let mut registry = BlockListRegistry::default();
        registry.block("alice", "bob");
        registry.block("alice", "carl");
        registry.block("dave", "alice");
        store.save(&registry).await.expect("save");

        assert_eq!(store.load().await.expect("load"), registry);
    }

    #[tokio::test]
    async fn corrupt_file_errors_on_load_but_degrades() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        tokio::fs::write(store.path(), b"{not json")
            .await
            .expect("write garbage");

        assert!(store.load().await.is_err());
        assert!(store.load_or_default().await.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_corrupt_state() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        tokio::fs::write(store.path(), b"\xff\xfe").await.expect("write garbage");

        store
            .update(|registry| registry.block("alice", "bob"))
            .await
            .expect("update");

        let registry = store.load().await.expect("load");
        assert!(registry.is_blocked("alice", "bob"));
    }

    #[tokio::test]
    async fn legacy_object_encoding_normalizes() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        tokio::fs::write(store.path(), br#"{"alice": {"bob": {}, "carl": {}}}"#)
            .await
            .expect("write legacy");

        let registry = store.load().await.expect("load");
        assert_eq!(registry.blocked("alice"), ["bob", "carl"]);
    }

    #[tokio::test]
    async fn output_is_pretty_printed_with_unicode_verbatim() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        let mut registry = BlockListRegistry::default();
        registry.block("ålice", "bøb");
        store.save(&registry).await.expect("save");

        let text = tokio::fs::read_to_string(store.path()).await.expect("read");
        assert!(text.contains("    \"bøb\""), "got: {text}");
        assert!(!text.contains("\\u"), "got: {text}");
    }

    #[tokio::test]
    async fn concurrent_updates_to_same_owner_both_survive() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.update(|r| r.block("alice", "bob")).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.update(|r| r.block("alice", "carl")).await })
        };
        a.await.expect("join").expect("update");
        b.await.expect("join").expect("update");

        let registry = store.load().await.expect("load");
        assert!(registry.is_blocked("alice", "bob"));
        assert!(registry.is_blocked("alice", "carl"));
    }
}
