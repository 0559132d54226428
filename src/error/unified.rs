//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidApiKey,
    InsufficientQuota,
    RateLimitExceeded,
    ModelNotFound,
    InvalidRequest,
    ContentFiltered,
    ServerError,
    Unknown,
}

impl ErrorCode {
    /// Map a vendor error code/type string onto a known code.
    pub fn from_provider_code(raw: &str) -> Self {
        match raw {
            "invalid_api_key" | "API_KEY_INVALID" | "authentication_error" => Self::InvalidApiKey,
            "insufficient_quota" | "RESOURCE_EXHAUSTED" => Self::InsufficientQuota,
            "rate_limit_exceeded" => Self::RateLimitExceeded,
            "model_not_found" | "NOT_FOUND" => Self::ModelNotFound,
            "invalid_request_error" | "INVALID_ARGUMENT" => Self::InvalidRequest,
            "content_filter" | "SAFETY" => Self::ContentFiltered,
            "server_error" | "INTERNAL" | "UNAVAILABLE" => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    ContentFilter,
    Output,
    Unavailable,
    Configuration,
    Serialization,
    Unknown,
}

/// Structured details returned by a provider API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: Option<ErrorCode>,
    pub provider_code: Option<String>,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    RevisePrompt,
    ContactSupport,
}
