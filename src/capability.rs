use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};

use crate::filter::IgnoreFilter;
use crate::host::{FilterManager, ResponseChannel, Session};
use crate::store::BlockListStore;

/// Contract a capability implements to be installed into the host's command
/// dispatcher. Subcommand dispatch is explicit; `handle` returns whether the
/// command was fully processed.
#[async_trait]
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    /// One-line help text per subcommand, in presentation order.
    fn help(&self) -> &[(&str, &str)];

    /// Installs this capability's message filters into the host chain.
    /// Must not fail the host: an unavailable chain is tolerated.
    fn register_filters(&self, manager: &mut dyn FilterManager);

    async fn handle(
        &self,
        subcommand: &str,
        args: &[String],
        session: &dyn Session,
        responses: &mut dyn ResponseChannel,
    ) -> bool;
}

const HELP: &[(&str, &str)] = &[
    ("add", "<username> - add to ignore list"),
    ("del", "<username> - remove from ignore list"),
    ("list", "- show ignore list"),
    ("clear", "- clear entire ignore list"),
];

enum IgnoreCommand {
    Add,
    Del,
    List,
    Clear,
}

impl IgnoreCommand {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "del" => Some(Self::Del),
            "list" => Some(Self::List),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

/// Self-service ignore list: users mutate only their own entry, and the
/// paired [`IgnoreFilter`] suppresses messages from anyone on it.
#[derive(Debug, Clone)]
pub struct IgnoreCapability<S> {
    store: S,
}

impl<S: BlockListStore> IgnoreCapability<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn add(&self, owner: &str, args: &[String], responses: &mut dyn ResponseChannel) {
        let Some(target) = args.first() else {
            responses.send("Usage: /ignore-add <username>").await;
            return;
        };
        let target = target.trim().to_owned();
        let reply = self
            .store
            .update(|registry| {
                registry.block(owner, &target);
                format!("Ignoring {target}.")
            })
            .await;
        self.reply(owner, reply, responses).await;
    }

    async fn del(&self, owner: &str, args: &[String], responses: &mut dyn ResponseChannel) {
        let Some(target) = args.first() else {
            responses.send("Usage: /ignore-del <username>").await;
            return;
        };
        let target = target.trim().to_owned();
        let reply = self
            .store
            .update(|registry| {
                if registry.unblock(owner, &target) {
                    format!("Stopped ignoring {target}.")
                } else {
                    format!("{target} is not in your ignore list.")
                }
            })
            .await;
        self.reply(owner, reply, responses).await;
    }

    async fn list(&self, owner: &str, responses: &mut dyn ResponseChannel) {
        let registry = self.store.load_or_default().await;
        let blocked = registry.blocked(owner);
        if blocked.is_empty() {
            responses.send("Ignore list is empty.").await;
        } else {
            responses
                .send(&format!("Ignore list: {}", blocked.join(", ")))
                .await;
        }
    }

    async fn clear(&self, owner: &str, responses: &mut dyn ResponseChannel) {
        let reply = self
            .store
            .update(|registry| {
                if registry.clear(owner) {
                    "Ignore list cleared.".to_owned()
                } else {
                    "Ignore list is already empty.".to_owned()
                }
            })
            .await;
        self.reply(owner, reply, responses).await;
    }

    /// Persist failures stay inside the capability: log, tell the user, and
    /// report the command handled so nothing escapes into the dispatch loop.
    async fn reply(
        &self,
        owner: &str,
        outcome: Result<String, crate::error::StoreError>,
        responses: &mut dyn ResponseChannel,
    ) {
        match outcome {
            Ok(text) => responses.send(&text).await,
            Err(e) => {
                error!("could not persist ignore list for {owner}: {e}");
                responses.send("Could not update your ignore list.").await;
            }
        }
    }
}

#[async_trait]
impl<S: BlockListStore> Capability for IgnoreCapability<S> {
    fn name(&self) -> &str {
        "ignore"
    }

    fn help(&self) -> &[(&str, &str)] {
        HELP
    }

    fn register_filters(&self, manager: &mut dyn FilterManager) {
        let filter = IgnoreFilter::new(self.store.clone());
        if let Err(e) = manager.register_message_filter(Arc::new(filter)) {
            debug!("ignore filter not installed: {e}");
        }
    }

    async fn handle(
        &self,
        subcommand: &str,
        args: &[String],
        session: &dyn Session,
        responses: &mut dyn ResponseChannel,
    ) -> bool {
        let Some(command) = IgnoreCommand::from_name(subcommand) else {
            return false;
        };
        // auth comes before argument validation
        let Some(owner) = session.username().map(str::to_owned) else {
            responses.send("Please log in first.").await;
            return true;
        };
        match command {
            IgnoreCommand::Add => self.add(&owner, args, responses).await,
            IgnoreCommand::Del => self.del(&owner, args, responses).await,
            IgnoreCommand::List => self.list(&owner, responses).await,
            IgnoreCommand::Clear => self.clear(&owner, responses).await,
        }
        true
    }
}
