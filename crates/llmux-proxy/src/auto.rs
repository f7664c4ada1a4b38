//! Auto-routing on a `provider/model` model string.

use axum::response::Response;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use llmux_core::{ProviderRegistry, ProxyTarget};

use crate::error::ProxyError;
use crate::forward::{ForwardRequest, proxy};
use crate::state::ProxyState;

/// Split `provider/model` on the first `/`.
///
/// Both halves must be non-empty and the provider must be configured.
pub fn parse_model_ref<'a>(
    model: &'a str,
    registry: &ProviderRegistry,
) -> Option<(&'a str, &'a str)> {
    let (provider, model) = model.split_once('/')?;
    if provider.is_empty() || model.is_empty() || !registry.contains(provider) {
        return None;
    }
    Some((provider, model))
}

/// Route a request by its body's `model` field, rewriting the field to the
/// bare model name before forwarding.
pub async fn auto_proxy(
    state: &ProxyState,
    upstream_path: &str,
    mut request: ForwardRequest,
) -> Result<Response, ProxyError> {
    let invalid = || ProxyError::InvalidModel {
        available: state.registry.names(),
    };

    let mut body: Value = serde_json::from_slice(&request.body).map_err(|_| invalid())?;
    let model = body
        .get("model")
        .and_then(Value::as_str)
        .ok_or_else(invalid)?;
    let (provider, bare) = parse_model_ref(model, &state.registry).ok_or_else(invalid)?;
    let target = ProxyTarget::new(provider, upstream_path);
    let bare = bare.to_string();

    debug!(provider = %target.provider, model = %bare, "Auto-routing request");

    body["model"] = Value::String(bare);
    request.body = Bytes::from(
        serde_json::to_vec(&body).map_err(|e| ProxyError::Internal(e.to_string()))?,
    );
    proxy(state, &target, request).await
}
