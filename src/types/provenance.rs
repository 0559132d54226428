//! Provenance: which providers were tried for an item and how each fared.

use serde::{Deserialize, Serialize};

use crate::models::Vendor;

/// Step name recorded for fallback-chain attempts.
pub const GENERATION_STEP: &str = "generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Success,
    Failed,
    Skipped,
}

/// One provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub step: String,
    pub model: String,
    pub status: AttemptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProvenanceEntry {
    pub fn success(vendor: Vendor) -> Self {
        Self::new(vendor, AttemptStatus::Success, None)
    }

    pub fn failed(vendor: Vendor, error: impl Into<String>) -> Self {
        Self::new(vendor, AttemptStatus::Failed, Some(error.into()))
    }

    pub fn skipped(vendor: Vendor, reason: impl Into<String>) -> Self {
        Self::new(vendor, AttemptStatus::Skipped, Some(reason.into()))
    }

    fn new(vendor: Vendor, status: AttemptStatus, error: Option<String>) -> Self {
        Self {
            step: GENERATION_STEP.to_string(),
            model: vendor.as_str().to_string(),
            status,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AttemptStatus::Success
    }
}

/// Vendor of the last successful entry.
pub fn winning_model(entries: &[ProvenanceEntry]) -> Option<&str> {
    entries
        .iter()
        .rev()
        .find(|e| e.is_success())
        .map(|e| e.model.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_entry_serializes_error() {
        let entry = ProvenanceEntry::failed(Vendor::Gemini, "HTTP 500");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"step": "generation", "model": "gemini", "status": "failed", "error": "HTTP 500"})
        );
    }

    #[test]
    fn success_entry_omits_error() {
        let json = serde_json::to_value(ProvenanceEntry::success(Vendor::DeepSeek)).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn winning_model_is_last_success() {
        let entries = vec![
            ProvenanceEntry::failed(Vendor::Gemini, "boom"),
            ProvenanceEntry::success(Vendor::DeepSeek),
        ];
        assert_eq!(winning_model(&entries), Some("deepseek"));
        assert_eq!(winning_model(&entries[..1]), None);
    }
}
