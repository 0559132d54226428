//! Typed vendor identifiers and alias handling.

use std::fmt;

/// Generative-AI vendors the forge knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vendor {
    Gemini,
    DeepSeek,
    OpenAi,
}

/// Fallback order used when no explicit order is supplied: cheapest and
/// fastest first.
pub const DEFAULT_PRIORITY: [Vendor; 3] = [Vendor::Gemini, Vendor::DeepSeek, Vendor::OpenAi];

impl Vendor {
    /// Canonical vendor key string, also used as the provenance `model` value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::OpenAi => "openai",
        }
    }

    /// Parse user-facing vendor aliases into a typed vendor.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "deepseek" | "deep-seek" => Some(Self::DeepSeek),
            "openai" | "open-ai" | "gpt" => Some(Self::OpenAi),
            _ => None,
        }
    }

    /// Environment variables holding the credential, in lookup order.
    pub const fn key_env_vars(self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY"],
            Self::OpenAi => &["OPENAI_API_KEY"],
        }
    }

    /// Prefix for the `<PREFIX>_BASE_URL` / `<PREFIX>_MODEL` overrides.
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI",
            Self::DeepSeek => "DEEPSEEK",
            Self::OpenAi => "OPENAI",
        }
    }

    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::DeepSeek => "https://api.deepseek.com",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::DeepSeek => "deepseek-chat",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
