//! OpenAI-style Chat Completions call shared by the OpenAI and DeepSeek adapters.

use serde::Deserialize;
use tracing::debug;

use crate::error::ForgeError;
use crate::models::Vendor;

use super::http::{bearer_headers, require_key, shared_client, status_to_error};

/// Single-turn JSON-mode client for a Chat Completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    vendor: Vendor,
    model: String,
    base_url: String,
}

impl ChatCompletionsClient {
    pub fn new(vendor: Vendor, model: String, base_url: String) -> Self {
        Self {
            vendor,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" },
            "stream": false,
        })
    }

    pub async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ForgeError> {
        let api_key = require_key(api_key)?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(vendor = %self.vendor, model = %self.model, "chat completion");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(api_key))
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ForgeError::api(status, "No choices in chat completion response"))?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ForgeError::ContentFiltered(format!(
                "{} stopped the completion with content_filter",
                self.vendor
            )));
        }

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ForgeError::api(status, "Empty completion content")),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
