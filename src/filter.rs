use async_trait::async_trait;

use crate::host::DeliveryContext;
use crate::store::BlockListStore;

/// Delivery-time suppression predicate. The host consults every registered
/// filter for every outbound message; `true` suppresses delivery.
#[async_trait]
pub trait MessageFilter: Send + Sync {
    async fn is_blocked(
        &self,
        recipient: &str,
        sender: &str,
        context: &DeliveryContext,
    ) -> bool;
}

/// Answers "has `recipient` ignored `sender`?" from the block-list store.
///
/// Reads fresh state on every call and never fails toward suppression: a
/// missing or corrupt registry means nothing is blocked, so a bad file can
/// degrade enforcement but never delivery.
#[derive(Debug, Clone)]
pub struct IgnoreFilter<S> {
    store: S,
}

impl<S: BlockListStore> IgnoreFilter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: BlockListStore> MessageFilter for IgnoreFilter<S> {
    async fn is_blocked(&self, recipient: &str, sender: &str, _: &DeliveryContext) -> bool {
        self.store
            .load_or_default()
            .await
            .is_blocked(recipient, sender)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::InMemoryBlockListStore;

    #[tokio::test]
    async fn reflects_store_contents() {
        let store = InMemoryBlockListStore::default();
        store
            .update(|r| r.block("alice", "bob"))
            .await
            .expect("update");

        let filter = IgnoreFilter::new(store);
        let ctx = DeliveryContext::default();
        assert!(filter.is_blocked("alice", "bob", &ctx).await);
        assert!(!filter.is_blocked("alice", "carl", &ctx).await);
        assert!(!filter.is_blocked("eve", "bob", &ctx).await);
    }
}
