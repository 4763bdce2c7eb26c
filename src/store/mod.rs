use async_trait::async_trait;
use log::warn;

use crate::error::StoreError;
use crate::registry::BlockListRegistry;

mod in_mem;
mod json_file;

pub use in_mem::InMemoryBlockListStore;
pub use json_file::JsonFileBlockListStore;

/// Durable, concurrency-safe home of the [`BlockListRegistry`].
///
/// Clones of a store share one lock domain, so `load`/`save` never observe a
/// torn registry and [`update`](BlockListStore::update) serializes whole
/// read-modify-write spans against each other.
#[async_trait]
pub trait BlockListStore: Send + Sync + Clone + 'static {
    /// Reads the full registry. Missing backing state is an empty registry,
    /// not an error; undecodable state is `Err`.
    async fn load(&self) -> Result<BlockListRegistry, StoreError>;

    /// Rewrites the full registry.
    async fn save(&self, registry: &BlockListRegistry) -> Result<(), StoreError>;

    /// Applies `mutate` to the current registry and persists the result,
    /// holding the store lock across the whole span. Unreadable prior state
    /// degrades to an empty registry before `mutate` runs.
    async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BlockListRegistry) -> R + Send,
        R: Send;

    /// `load`, degrading unreadable state to an empty registry. The one place
    /// storage corruption is absorbed: delivery and command handling keep
    /// working as if no blocks were configured.
    async fn load_or_default(&self) -> BlockListRegistry {
        match self.load().await {
            Ok(registry) => registry,
            Err(e) => {
                warn!("ignore registry unreadable, treating as empty: {e}");
                BlockListRegistry::default()
            }
        }
    }
}
