//! Upstream provider configuration and lookup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named upstream LLM API endpoint family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Unique provider name used in routes and model prefixes.
    pub name: String,
    /// Base URL requests are forwarded to (e.g. `https://api.anthropic.com`).
    pub base_url: String,
    /// Bearer token injected into every forwarded request, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl ProviderConfig {
    /// Create a provider without credentials.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            auth_token: None,
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Build the full upstream URL for a path such as `v1/messages`.
    ///
    /// The query string, when present, is appended verbatim.
    pub fn upstream_url(&self, upstream_path: &str, query: Option<&str>) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = upstream_path.trim_start_matches('/');
        match query {
            Some(q) if !q.is_empty() => format!("{base}/{path}?{q}"),
            _ => format!("{base}/{path}"),
        }
    }

    /// `Authorization` header value for this provider, if it has a token.
    pub fn bearer(&self) -> Option<String> {
        self.auth_token.as_deref().map(|t| format!("Bearer {t}"))
    }
}

/// Provider plus upstream path resolved for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub provider: String,
    pub upstream_path: String,
}

impl ProxyTarget {
    pub fn new(provider: impl Into<String>, upstream_path: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            upstream_path: upstream_path.into(),
        }
    }

    /// Whether responses on this path belong to the conversation family and
    /// should be captured for the session transcript.
    ///
    /// This is a substring match, so `v1/messages/count_tokens` is included.
    pub fn is_conversation(&self) -> bool {
        self.upstream_path.contains("messages")
    }
}

/// Lookup failure for a provider name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown provider: {requested}. Available providers: {}", .available.join(", "))]
pub struct UnknownProvider {
    /// The name that was asked for.
    pub requested: String,
    /// Every configured provider name, in configuration order.
    pub available: Vec<String>,
}

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate provider name: {0}")]
    DuplicateName(String),

    #[error("Provider name must not be empty")]
    EmptyName,

    #[error("Provider '{0}' has an empty base URL")]
    EmptyBaseUrl(String),
}

/// Immutable table of configured providers.
///
/// Built once at startup and shared read-only across all requests.
/// Iteration follows configuration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Build a registry, rejecting duplicate or empty names.
    pub fn new(providers: Vec<ProviderConfig>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(providers.len());
        for (pos, provider) in providers.iter().enumerate() {
            if provider.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if provider.base_url.trim().is_empty() {
                return Err(RegistryError::EmptyBaseUrl(provider.name.clone()));
            }
            if index.insert(provider.name.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateName(provider.name.clone()));
            }
        }
        Ok(Self { providers, index })
    }

    /// Look up a provider by exact name.
    pub fn resolve(&self, name: &str) -> Result<&ProviderConfig, UnknownProvider> {
        self.get(name).ok_or_else(|| UnknownProvider {
            requested: name.to_string(),
            available: self.names(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ProviderConfig> {
        self.index.get(name).map(|&pos| &self.providers[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Provider names in configuration order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }

    pub const fn len(&self) -> usize {
        self.providers.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    // Tokens stay out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| (&p.name, &p.base_url)))
            .finish()
    }
}
