//! Shared HTTP client, auth headers, and status classification.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{ErrorCode, ErrorDetails, ForgeError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// The transport timeout is a backstop; the orchestrator applies the
/// configured per-call and chain deadlines.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Build Gemini-style headers (`x-goog-api-key`), keeping the key out of URLs.
pub fn google_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert("x-goog-api-key", val);
    }
    headers
}

/// Reject blank credentials before any network call is made.
pub fn require_key(api_key: &str) -> Result<&str, ForgeError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(ForgeError::Authentication("missing API key".into()));
    }
    Ok(key)
}

/// Map a non-success HTTP status and body onto a classified error.
pub fn status_to_error(status: u16, body: &str) -> ForgeError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let error_obj = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error_obj
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => ForgeError::Authentication(message),
        429 => ForgeError::RateLimited {
            retry_after_ms: extract_retry_after(parsed.as_ref()),
        },
        _ => {
            let provider_code = error_obj.and_then(|e| {
                ["code", "status", "type"]
                    .iter()
                    .find_map(|field| e.get(*field).and_then(|c| c.as_str()))
                    .map(str::to_string)
            });
            match provider_code {
                Some(code) => ForgeError::api_with_details(
                    status,
                    message,
                    ErrorDetails {
                        code: Some(ErrorCode::from_provider_code(&code)),
                        provider_code: Some(code),
                    },
                ),
                None => ForgeError::api(status, message),
            }
        }
    }
}

fn extract_retry_after(body: Option<&serde_json::Value>) -> Option<u64> {
    body.and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("retry_after"))
            .and_then(|r| r.as_f64())
            .map(|s| (s * 1000.0) as u64)
    })
}
