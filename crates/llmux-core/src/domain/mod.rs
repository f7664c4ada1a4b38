//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (HTTP framework, filesystem, etc.).
//!
//! # Structure
//!
//! - `provider` - Upstream provider configuration and the registry
//! - `session` - Session id correlation from request metadata
//! - `transcript` - Persisted session transcript records

mod provider;
mod session;
mod transcript;

pub use provider::{ProviderConfig, ProviderRegistry, ProxyTarget, RegistryError, UnknownProvider};
pub use session::{SESSION_MARKER, extract_session_id};
pub use transcript::{ChatTurn, TranscriptRecord};
