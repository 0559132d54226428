//! Provider adapter trait and vendor implementations.

pub mod http;

#[cfg(any(feature = "openai", feature = "deepseek"))]
pub mod chat_completions;

#[cfg(feature = "deepseek")]
pub mod deepseek;
#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ForgeConfig;
use crate::error::ForgeError;
use crate::models::Vendor;

/// One vendor's call convention: prompt in, raw model text out.
///
/// Implementations make exactly one outbound request per call and never
/// retry; fallback and retries belong to the orchestrator and validator.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Vendor served by this adapter; selects the credential and names provenance.
    fn vendor(&self) -> Vendor;

    /// Model id sent to the vendor.
    fn model_id(&self) -> &str;

    /// Send `prompt` and return the model's text.
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ForgeError>;
}

/// Create the built-in adapter for a vendor, if its feature is enabled.
#[allow(unused_variables)]
pub fn create_adapter(
    vendor: Vendor,
    config: &ForgeConfig,
) -> Result<Arc<dyn ProviderAdapter>, ForgeError> {
    match vendor {
        #[cfg(feature = "gemini")]
        Vendor::Gemini => Ok(Arc::new(gemini::GeminiAdapter::new(
            config.model(vendor),
            config.base_url(vendor),
        ))),
        #[cfg(feature = "deepseek")]
        Vendor::DeepSeek => Ok(Arc::new(deepseek::DeepSeekAdapter::new(
            config.model(vendor),
            config.base_url(vendor),
        ))),
        #[cfg(feature = "openai")]
        Vendor::OpenAi => Ok(Arc::new(openai::OpenAiAdapter::new(
            config.model(vendor),
            config.base_url(vendor),
        ))),
        #[allow(unreachable_patterns)]
        _ => Err(ForgeError::Configuration(format!(
            "Adapter for '{vendor}' not enabled via feature flags"
        ))),
    }
}

/// Adapters for every enabled vendor, in
/// [`DEFAULT_PRIORITY`](crate::models::vendor::DEFAULT_PRIORITY) order.
pub fn default_adapters(config: &ForgeConfig) -> Vec<Arc<dyn ProviderAdapter>> {
    crate::models::vendor::DEFAULT_PRIORITY
        .into_iter()
        .filter_map(|vendor| match create_adapter(vendor, config) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                tracing::debug!(%vendor, error = %e, "skipping disabled adapter");
                None
            }
        })
        .collect()
}
