pub mod capability;
pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod registry;
pub mod store;

pub use capability::{Capability, IgnoreCapability};
pub use error::{FilterError, StoreError};
pub use filter::{IgnoreFilter, MessageFilter};
pub use registry::BlockListRegistry;
pub use store::{BlockListStore, InMemoryBlockListStore, JsonFileBlockListStore};
