//! Core domain types and ports for the llmux gateway.
//!
//! This crate holds everything that does not depend on an HTTP framework or a
//! storage backend: the provider registry, session correlation, assistant reply
//! reconstruction, provider-file loading and the transcript persistence port.
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod reconstruct;

// Re-export commonly used types for convenience
pub use config::{ConfigError, load_providers, parse_providers};
pub use domain::{
    ChatTurn, ProviderConfig, ProviderRegistry, ProxyTarget, RegistryError, SESSION_MARKER,
    TranscriptRecord, UnknownProvider, extract_session_id,
};
pub use ports::{TranscriptStore, TranscriptStoreError};
pub use reconstruct::{SseReconstructor, extract_json_content, reconstruct_reply};
