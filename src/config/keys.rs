//! Per-invocation provider credentials.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ForgeError, Result};
use crate::models::Vendor;

/// Credentials for one generation call, keyed by vendor.
///
/// Supplied by the caller and never persisted by the forge. Empty strings
/// count as "no credential".
#[derive(Clone, Default)]
pub struct ProviderKeySet {
    keys: HashMap<Vendor, String>,
}

impl fmt::Debug for ProviderKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vendors: Vec<_> = self.keys.keys().map(|v| v.as_str()).collect();
        vendors.sort_unstable();
        f.debug_struct("ProviderKeySet")
            .field("vendors", &vendors)
            .finish()
    }
}

impl ProviderKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, vendor: Vendor, key: impl Into<String>) -> Self {
        self.insert(vendor, key);
        self
    }

    pub fn insert(&mut self, vendor: Vendor, key: impl Into<String>) {
        let key = key.into();
        if key.trim().is_empty() {
            self.keys.remove(&vendor);
        } else {
            self.keys.insert(vendor, key);
        }
    }

    /// Build from `(vendor name, key)` pairs as they arrive from a form or
    /// request body, e.g. `("google", "...")`. Unknown vendor names are rejected.
    pub fn from_named<I, N, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, K)>,
        N: AsRef<str>,
        K: Into<String>,
    {
        let mut set = Self::new();
        for (name, key) in pairs {
            let vendor = Vendor::parse(name.as_ref()).ok_or_else(|| {
                ForgeError::InvalidArgument(format!("unknown provider '{}'", name.as_ref()))
            })?;
            set.insert(vendor, key);
        }
        Ok(set)
    }

    pub fn get(&self, vendor: Vendor) -> Option<&str> {
        self.keys.get(&vendor).map(String::as_str)
    }

    pub fn contains(&self, vendor: Vendor) -> bool {
        self.keys.contains_key(&vendor)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Read `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `DEEPSEEK_API_KEY` and
    /// `OPENAI_API_KEY`, loading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut set = Self::new();
        for vendor in crate::models::vendor::DEFAULT_PRIORITY {
            if let Some(key) = vendor
                .key_env_vars()
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            {
                set.insert(vendor, key);
            }
        }
        set
    }
}
