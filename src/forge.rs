//! High-level entry point: request in, validated item out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ForgeConfig, ProviderKeySet, TimeoutSettings};
use crate::error::{ForgeError, Result};
use crate::generation::{Draft, Orchestrator};
use crate::models::Vendor;
use crate::provider::{default_adapters, ProviderAdapter};
use crate::store::CreationStore;
use crate::types::{GeneratedItem, GenerationRequest};
use crate::validation::{Validated, ValidationPolicy, Validator};

/// Largest batch accepted by [`Forge::generate_batch`].
pub const MAX_BATCH: usize = 10;

/// Wires the fallback chain, the validator and an optional history store.
///
/// ```no_run
/// use kimetsu_forge::prelude::*;
///
/// # async fn example() -> kimetsu_forge::error::Result<()> {
/// let forge = Forge::new(ForgeConfig::load()?)?;
/// let request = GenerationRequest::builder()
///     .category(Category::Weapon)
///     .rarity(Rarity::Rare)
///     .level(12)
///     .build();
/// let item = forge.generate(&request, &ProviderKeySet::from_env()).await?;
/// println!("{} ({:?})", item.base.nome, item.model());
/// # Ok(())
/// # }
/// ```
pub struct Forge {
    orchestrator: Orchestrator,
    validator: Validator,
    store: Option<Arc<dyn CreationStore>>,
}

impl Forge {
    /// Forge with the built-in adapters for every enabled vendor.
    pub fn new(config: ForgeConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> ForgeBuilder {
        ForgeBuilder::default()
    }

    /// Vendors in fallback order.
    pub fn priority(&self) -> Vec<Vendor> {
        self.orchestrator.priority()
    }

    pub fn store(&self) -> Option<&Arc<dyn CreationStore>> {
        self.store.as_ref()
    }

    /// Generate one item.
    ///
    /// Each validation attempt walks the whole fallback chain. A store
    /// failure is logged and does not discard the item.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        keys: &ProviderKeySet,
    ) -> Result<GeneratedItem> {
        request.validate()?;

        let Validated { value, metadata } = self
            .validator
            .generate_stable(request, || self.orchestrator.run(request, keys))
            .await?;
        let Draft {
            mut base,
            body,
            provenance,
            vendor,
        } = value;
        base.normalize(request, &body);

        let item = GeneratedItem {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            category: request.category,
            base,
            body,
            provenance,
            validation: Some(metadata),
        };
        info!(
            %vendor,
            category = %item.category,
            score = item.validation.as_ref().map_or(0, |v| v.score),
            "item generated"
        );

        if let Some(store) = &self.store {
            if let Err(e) = store.record(&item).await {
                warn!(error = %e, id = %item.id, "failed to record item in history");
            }
        }
        Ok(item)
    }

    /// Generate `quantity` items one after another, stopping at the first error.
    pub async fn generate_batch(
        &self,
        request: &GenerationRequest,
        keys: &ProviderKeySet,
        quantity: usize,
    ) -> Result<Vec<GeneratedItem>> {
        if quantity == 0 || quantity > MAX_BATCH {
            return Err(ForgeError::InvalidArgument(format!(
                "quantity must be between 1 and {MAX_BATCH}, got {quantity}"
            )));
        }
        let mut items = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            items.push(self.generate(request, keys).await?);
        }
        Ok(items)
    }
}

/// Builder for [`Forge`]. Explicit settings win over the config's.
#[derive(Default)]
pub struct ForgeBuilder {
    config: ForgeConfig,
    adapters: Option<Vec<Arc<dyn ProviderAdapter>>>,
    policy: Option<ValidationPolicy>,
    timeouts: Option<TimeoutSettings>,
    store: Option<Arc<dyn CreationStore>>,
}

impl ForgeBuilder {
    pub fn config(mut self, config: ForgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the built-in adapters; the order given is the fallback order.
    pub fn adapters(mut self, adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        self.adapters = Some(adapters);
        self
    }

    pub fn validation(mut self, policy: ValidationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn timeouts(mut self, timeouts: TimeoutSettings) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    pub fn store(mut self, store: Arc<dyn CreationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Forge> {
        let mut config = self.config;
        if let Some(policy) = self.policy {
            config.validation = policy;
        }
        if let Some(timeouts) = self.timeouts {
            config.timeouts = timeouts;
        }
        config.validate()?;

        let adapters = match self.adapters {
            Some(adapters) => adapters,
            None => default_adapters(&config),
        };
        if adapters.is_empty() {
            return Err(ForgeError::Configuration(
                "no provider adapters are enabled".into(),
            ));
        }

        Ok(Forge {
            orchestrator: Orchestrator::new(adapters, config.timeouts),
            validator: Validator::new(config.validation),
            store: self.store,
        })
    }
}
