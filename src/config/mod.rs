//! Configuration system (layered: defaults < TOML file < environment).

pub mod keys;

pub use keys::ProviderKeySet;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::models::Vendor;
use crate::validation::ValidationPolicy;

const CALL_TIMEOUT_ENV: &str = "KIMETSU_FORGE_CALL_TIMEOUT_SECS";
const TOTAL_TIMEOUT_ENV: &str = "KIMETSU_FORGE_TOTAL_TIMEOUT_SECS";

/// Largest accepted timeout (one day), for both the per-call and total budget.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Endpoint and model overrides for one vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorSettings {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Deadlines applied to the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Upper bound for a single provider call.
    pub per_call_secs: u64,
    /// Upper bound for the whole chain of one generation attempt.
    pub total_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            per_call_secs: 60,
            total_secs: 150,
        }
    }
}

impl TimeoutSettings {
    pub fn per_call(&self) -> Duration {
        Duration::from_secs(self.per_call_secs)
    }

    pub fn total(&self) -> Duration {
        Duration::from_secs(self.total_secs)
    }
}

/// Forge configuration.
///
/// ```toml
/// [deepseek]
/// model = "deepseek-chat"
///
/// [timeouts]
/// per_call_secs = 30
///
/// [validation]
/// max_attempts = 2
/// threshold = 80
/// ```
///
/// Provider priority is deliberately absent: it is a policy owned by the
/// orchestrator, not a user setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub gemini: VendorSettings,
    pub deepseek: VendorSettings,
    pub openai: VendorSettings,
    pub timeouts: TimeoutSettings,
    pub validation: ValidationPolicy,
}

impl ForgeConfig {
    /// Default config file location (`<config dir>/kimetsu-forge/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "kimetsu-forge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| ForgeError::Configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Defaults, then the default config file if it exists, then environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let base = match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading forge config file");
                Self::load_file(path)?
            }
            _ => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply `<VENDOR>_BASE_URL`, `<VENDOR>_MODEL` and timeout variables.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        for vendor in crate::models::vendor::DEFAULT_PRIORITY {
            let prefix = vendor.env_prefix();
            let settings = self.vendor_mut(vendor);
            if let Some(url) = env_value(&format!("{prefix}_BASE_URL")) {
                settings.base_url = Some(url);
            }
            if let Some(model) = env_value(&format!("{prefix}_MODEL")) {
                settings.model = Some(model);
            }
        }
        if let Some(secs) = env_secs(CALL_TIMEOUT_ENV)? {
            self.timeouts.per_call_secs = secs;
        }
        if let Some(secs) = env_secs(TOTAL_TIMEOUT_ENV)? {
            self.timeouts.total_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let TimeoutSettings {
            per_call_secs,
            total_secs,
        } = self.timeouts;
        if per_call_secs == 0 || total_secs == 0 {
            return Err(ForgeError::Configuration(
                "timeouts must be greater than zero".into(),
            ));
        }
        if per_call_secs > MAX_TIMEOUT_SECS || total_secs > MAX_TIMEOUT_SECS {
            return Err(ForgeError::Configuration(format!(
                "timeouts must not exceed {MAX_TIMEOUT_SECS} seconds"
            )));
        }
        self.validation.validate()
    }

    pub fn vendor(&self, vendor: Vendor) -> &VendorSettings {
        match vendor {
            Vendor::Gemini => &self.gemini,
            Vendor::DeepSeek => &self.deepseek,
            Vendor::OpenAi => &self.openai,
        }
    }

    fn vendor_mut(&mut self, vendor: Vendor) -> &mut VendorSettings {
        match vendor {
            Vendor::Gemini => &mut self.gemini,
            Vendor::DeepSeek => &mut self.deepseek,
            Vendor::OpenAi => &mut self.openai,
        }
    }

    /// Effective base URL for a vendor, without a trailing slash.
    pub fn base_url(&self, vendor: Vendor) -> String {
        self.vendor(vendor)
            .base_url
            .as_deref()
            .unwrap_or(vendor.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Effective model id for a vendor.
    pub fn model(&self, vendor: Vendor) -> String {
        self.vendor(vendor)
            .model
            .clone()
            .unwrap_or_else(|| vendor.default_model().to_string())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_secs(name: &str) -> Result<Option<u64>> {
    match env_value(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| {
                ForgeError::Configuration(format!("{name} must be a whole number of seconds"))
            }),
    }
}
