use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::registry::BlockListRegistry;
use crate::store::BlockListStore;

/// Non-durable store for tests and hosts that opt out of persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlockListStore {
    registry: Arc<Mutex<BlockListRegistry>>,
}

#[async_trait]
impl BlockListStore for InMemoryBlockListStore {
    async fn load(&self) -> Result<BlockListRegistry, StoreError> {
        Ok(self.registry.lock().await.clone())
    }

    async fn save(&self, registry: &BlockListRegistry) -> Result<(), StoreError> {
        *self.registry.lock().await = registry.clone();
        Ok(())
    }

    async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BlockListRegistry) -> R + Send,
        R: Send,
    {
        let mut registry = self.registry.lock().await;
        Ok(mutate(&mut registry))
    }
}
