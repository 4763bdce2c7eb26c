//! Narrow traits for the pieces of the host dispatch server this capability
//! consumes. The host implements these; tests use in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FilterError;
use crate::filter::MessageFilter;

/// Per-message metadata the host threads through its filter chain. Opaque to
/// this capability; accepted only to satisfy the chain's calling convention.
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext;

/// A connected user's session as the host sees it.
pub trait Session: Send + Sync {
    /// The username this session is authenticated as, if any.
    fn username(&self) -> Option<&str>;
}

/// The host's primitive for sending a reply string back to the invoking
/// client over whatever transport and encryption it uses.
#[async_trait]
pub trait ResponseChannel: Send + Sync {
    async fn send(&mut self, text: &str);
}

/// The host's message-filter chain. A registered filter is consulted for
/// every outbound message; `true` suppresses delivery.
pub trait FilterManager {
    fn register_message_filter(
        &mut self,
        filter: Arc<dyn MessageFilter>,
    ) -> Result<(), FilterError>;
}
