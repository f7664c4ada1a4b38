//! `llmux providers`.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;

use llmux_core::{ProviderRegistry, load_providers};

/// Print the providers configured in `path`.
pub fn execute(path: &Path) -> Result<()> {
    let registry = load_providers(path)?;
    print!("{}", render(&registry));
    Ok(())
}

/// One line per provider: name, base URL and whether a token is set.
/// Tokens themselves are never printed.
pub fn render(registry: &ProviderRegistry) -> String {
    if registry.is_empty() {
        return "No providers configured.\n".to_string();
    }

    let width = registry.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for provider in registry.iter() {
        let auth = if provider.auth_token.is_some() {
            "token"
        } else {
            "no token"
        };
        let _ = writeln!(
            out,
            "{:<width$}  {}  ({auth})",
            provider.name, provider.base_url
        );
    }
    out
}
