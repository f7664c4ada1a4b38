//! Transcript store adapters for the llmux gateway.
//!
//! - [`JsonFileTranscriptStore`] keeps one pretty-printed JSON file per session
//!   in a directory, overwritten on every completed exchange.
//! - [`InMemoryTranscriptStore`] keeps records in a map, for tests and
//!   throwaway deployments.
#![deny(unsafe_code)]

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileTranscriptStore;
pub use memory::InMemoryTranscriptStore;
