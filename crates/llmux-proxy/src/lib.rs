//! HTTP gateway for llmux.
//!
//! Fronts every configured provider behind one axum router:
//!
//! - `/proxy/{provider}/...` forwards to a named provider
//! - `/auto/v1/...` picks the provider from a `provider/model` model string
//! - `/models` and `/auto/v1/models` aggregate model listings
//!
//! Conversation responses are teed: the caller receives upstream bytes
//! unchanged while a background task reconstructs the assistant reply and
//! hands it to a [`TranscriptStore`](llmux_core::TranscriptStore).

pub mod aggregate;
pub mod auto;
pub mod error;
pub mod forward;
pub mod models;
pub mod server;
pub mod state;
pub mod tee;

pub use aggregate::{DEFAULT_MODELS_TIMEOUT, ModelAggregator};
pub use error::ProxyError;
pub use server::{router, serve};
pub use state::ProxyState;
