//! Convenience re-exports for common use.

pub use crate::config::{ForgeConfig, ProviderKeySet, TimeoutSettings};
pub use crate::error::{ForgeError, Result};
pub use crate::forge::Forge;
pub use crate::models::Vendor;
pub use crate::provider::ProviderAdapter;
pub use crate::store::{CreationStore, ExportPayload, MemoryStore};
pub use crate::types::{
    Category, GeneratedItem, GenerationRequest, ItemBody, ProvenanceEntry, Rarity,
};
pub use crate::validation::ValidationPolicy;
