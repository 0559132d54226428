//! Error types for the forge.

pub mod unified;

pub use unified::{ErrorCategory, ErrorCode, ErrorDetails, RecoverySuggestion};

use thiserror::Error;

use crate::models::Vendor;

/// One failed provider attempt, kept for the aggregate error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub vendor: Vendor,
    pub message: String,
}

/// Primary error type for all forge operations.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<ErrorDetails>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Content rejected by safety filter: {0}")]
    ContentFiltered(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error ({vendor}): {source}")]
    Provider {
        vendor: Vendor,
        #[source]
        source: Box<ForgeError>,
    },

    #[error("Malformed model output: {reason}")]
    MalformedOutput { reason: String, raw: String },

    #[error("No provider available: {}", summarize_attempts(.attempts))]
    NoProviderAvailable { attempts: Vec<AttemptFailure> },
}

fn summarize_attempts(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        return "no credentials were supplied for any configured provider".to_string();
    }
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.vendor, a.message))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl ForgeError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error with vendor details.
    pub fn api_with_details(
        status: u16,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Wrap an adapter failure with the vendor that produced it.
    pub fn provider(vendor: Vendor, source: ForgeError) -> Self {
        Self::Provider {
            vendor,
            source: Box::new(source),
        }
    }

    /// Model text that holds no extractable JSON.
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedOutput {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::ContentFiltered(_) => ErrorCategory::ContentFilter,
            Self::MalformedOutput { .. } => ErrorCategory::Output,
            Self::NoProviderAvailable { .. } => ErrorCategory::Unavailable,
            Self::Provider { source, .. } => source.category(),
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::NoProviderAvailable { attempts } if attempts.is_empty() => {
                return RecoverySuggestion::CheckCredentials
            }
            _ => {}
        }
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Network => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::ContentFilter | ErrorCategory::Output => {
                RecoverySuggestion::RevisePrompt
            }
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ForgeError>;
