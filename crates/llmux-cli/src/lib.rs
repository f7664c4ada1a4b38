//! Command-line front end for the llmux gateway.
//!
//! `main.rs` parses arguments and dispatches; [`bootstrap`] is the only place
//! where the provider registry, transcript store and proxy state are wired
//! together.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;

pub use bootstrap::{ServeConfig, build_state, init_logging, load_env};
pub use commands::{Commands, ServeArgs};
pub use parser::Cli;
