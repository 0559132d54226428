//! Google Gemini adapter (`generateContent`).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ForgeError;
use crate::models::Vendor;

use super::http::{google_headers, require_key, shared_client, status_to_error};
use super::ProviderAdapter;

pub struct GeminiAdapter {
    model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        })
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Gemini
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ForgeError> {
        let api_key = require_key(api_key)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        debug!(model = %self.model, "Gemini generateContent");

        let resp = shared_client()
            .post(&url)
            .headers(google_headers(api_key))
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await?;

        if let Some(reason) = data.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ForgeError::ContentFiltered(format!("prompt blocked: {reason}")));
        }

        let candidate = data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ForgeError::api(status, "No candidates in Gemini response"))?;

        if matches!(
            candidate.finish_reason.as_deref(),
            Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST")
        ) {
            return Err(ForgeError::ContentFiltered(format!(
                "candidate stopped with {}",
                candidate.finish_reason.unwrap_or_default()
            )));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ForgeError::api(status, "Empty Gemini candidate"));
        }
        Ok(text)
    }
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
