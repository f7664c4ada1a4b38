//! Provider file loading.
//!
//! Providers are declared in a JSON object keyed by provider name:
//!
//! ```json
//! {
//!   "anthropic": { "baseUrl": "https://api.anthropic.com", "authToken": "sk-..." },
//!   "zai": { "baseUrl": "https://api.z.ai/api/anthropic" }
//! }
//! ```
//!
//! Key order is kept, so error messages and listings follow the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{ProviderConfig, ProviderRegistry, RegistryError};

/// Errors raised while loading the provider file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read provider file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid provider file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid entry for provider '{name}': {source}")]
    Entry {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One entry of the provider file (the name is the object key).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderEntry {
    base_url: String,
    #[serde(default)]
    auth_token: Option<String>,
}

/// Parse a provider file body into a registry.
///
/// Empty `authToken` strings are treated as "no token".
pub fn parse_providers(raw: &str) -> Result<ProviderRegistry, ConfigError> {
    let entries: Map<String, Value> = serde_json::from_str(raw)?;
    let mut providers = Vec::with_capacity(entries.len());

    for (name, value) in entries {
        let entry: ProviderEntry =
            serde_json::from_value(value).map_err(|source| ConfigError::Entry {
                name: name.clone(),
                source,
            })?;
        let mut provider = ProviderConfig::new(name, entry.base_url);
        provider.auth_token = entry.auth_token.filter(|t| !t.is_empty());
        providers.push(provider);
    }

    Ok(ProviderRegistry::new(providers)?)
}

/// Read and parse the provider file at `path`.
pub fn load_providers(path: &Path) -> Result<ProviderRegistry, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = parse_providers(&raw)?;
    tracing::debug!(
        path = %path.display(),
        providers = registry.len(),
        "Loaded provider configuration"
    );
    Ok(registry)
}
