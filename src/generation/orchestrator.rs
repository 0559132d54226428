//! Sequential provider fallback chain.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{ProviderKeySet, TimeoutSettings};
use crate::error::{AttemptFailure, ForgeError, Result};
use crate::extract::extract_object;
use crate::models::Vendor;
use crate::prompt::{build_prompt, Template};
use crate::provider::ProviderAdapter;
use crate::types::{BaseFields, GenerationRequest, ItemBody, ProvenanceEntry};
use crate::util::timeout::{remaining, with_timeout};
use crate::validation::{Assess, Assessment};

/// One successful run of the chain, before validation and assembly.
#[derive(Debug, Clone)]
pub struct Draft {
    pub base: BaseFields,
    pub body: ItemBody,
    /// Attempts of this run only, ending with the successful one.
    pub provenance: Vec<ProvenanceEntry>,
    pub vendor: Vendor,
}

impl Assess for Draft {
    fn assess(&self, request: &GenerationRequest) -> Assessment {
        crate::validation::rules::assess(request, &self.base, &self.body)
    }
}

/// Tries adapters in a fixed order until one yields a decodable object.
///
/// Providers are never called in parallel: the order encodes a cost/quality
/// preference and the first success makes the rest unnecessary.
pub struct Orchestrator {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    per_call: Duration,
    total: Duration,
}

impl Orchestrator {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>, timeouts: TimeoutSettings) -> Self {
        Self {
            adapters,
            per_call: timeouts.per_call(),
            total: timeouts.total(),
        }
    }

    /// Vendors in the order they will be tried.
    pub fn priority(&self) -> Vec<Vendor> {
        self.adapters.iter().map(|a| a.vendor()).collect()
    }

    /// Run the chain once.
    pub async fn run(&self, request: &GenerationRequest, keys: &ProviderKeySet) -> Result<Draft> {
        let prompt = build_prompt(request);
        let template = Template::for_category(request.category);
        let deadline = deadline_after(self.total);

        let mut provenance = Vec::new();
        let mut failures = Vec::new();

        for adapter in &self.adapters {
            let vendor = adapter.vendor();
            let Some(api_key) = keys.get(vendor) else {
                debug!(%vendor, "no credential, skipping provider");
                continue;
            };

            let Some(left) = remaining(deadline) else {
                warn!(%vendor, "generation deadline exhausted before provider call");
                provenance.push(ProvenanceEntry::skipped(vendor, "deadline exceeded"));
                failures.push(AttemptFailure {
                    vendor,
                    message: "skipped: deadline exceeded".into(),
                });
                continue;
            };

            debug!(%vendor, model = adapter.model_id(), "calling provider");
            let outcome = with_timeout(self.per_call.min(left), adapter.complete(&prompt, api_key))
                .await
                .and_then(|text| decode(template, &text));

            match outcome {
                Ok((base, body)) => {
                    info!(
                        %vendor,
                        model = adapter.model_id(),
                        "provider produced structured output"
                    );
                    provenance.push(ProvenanceEntry::success(vendor));
                    return Ok(Draft {
                        base,
                        body,
                        provenance,
                        vendor,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    let err = ForgeError::provider(vendor, e);
                    warn!(error = %err, category = ?err.category(), "provider failed, trying next");
                    provenance.push(ProvenanceEntry::failed(vendor, message.clone()));
                    failures.push(AttemptFailure { vendor, message });
                }
            }
        }

        Err(ForgeError::NoProviderAvailable { attempts: failures })
    }
}

/// Roughly 30 years; stands in for "no deadline" when the budget overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(budget: Duration) -> tokio::time::Instant {
    let now = tokio::time::Instant::now();
    now.checked_add(budget)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Extract the object and decode it into the template's typed shape.
///
/// Nested fields decode leniently, so any JSON object is accepted here;
/// shape problems surface as validation warnings instead.
fn decode(template: Template, text: &str) -> Result<(BaseFields, ItemBody)> {
    let object = serde_json::Value::Object(extract_object(text)?);
    let base = BaseFields::deserialize(&object)
        .map_err(|e| ForgeError::malformed(format!("base fields: {e}"), text))?;
    let body = ItemBody::decode(template, &object)
        .map_err(|e| ForgeError::malformed(format!("category fields: {e}"), text))?;
    Ok((base, body))
}
