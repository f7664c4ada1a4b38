//! Axum router and server runner for the gateway.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use llmux_core::ProxyTarget;

use crate::auto::auto_proxy;
use crate::error::ProxyError;
use crate::forward::{ForwardRequest, proxy};
use crate::models::{HealthResponse, ModelsOverview, PrefixedModels};
use crate::state::ProxyState;

/// Largest request body accepted from callers.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the gateway router.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/models", get(list_models))
        .route("/proxy/{provider}/v1/messages", post(proxy_messages))
        .route(
            "/proxy/{provider}/v1/messages/count_tokens",
            post(proxy_count_tokens),
        )
        .route("/proxy/{provider}/v1/models", get(proxy_models))
        .route(
            "/proxy/{provider}/v1/chat/completions",
            post(proxy_chat_completions),
        )
        .route("/auto/v1/models", get(auto_models))
        .route("/auto/v1/chat/completions", post(auto_chat_completions))
        .route("/auto/v1/messages", post(auto_messages))
        .route("/auto/v1/messages/count_tokens", post(auto_count_tokens))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the gateway on a pre-bound listener until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: ProxyState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let providers = state.registry.names();
    let app = router(state);

    info!(%addr, providers = %providers.join(", "), "Gateway listening");
    if let Some(first) = providers.first() {
        info!("Example: POST http://{addr}/proxy/{first}/v1/messages");
        info!("Example: POST http://{addr}/auto/v1/messages with model \"{first}/<model>\"");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn health_check(State(state): State<ProxyState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.registry.names(),
        timestamp: Utc::now(),
    })
}

async fn list_models(State(state): State<ProxyState>) -> Json<ModelsOverview> {
    Json(state.aggregator().list_all().await)
}

async fn auto_models(State(state): State<ProxyState>) -> Json<PrefixedModels> {
    Json(state.aggregator().list_all_prefixed().await)
}

async fn proxy_messages(
    State(state): State<ProxyState>,
    Path(provider): Path<String>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    proxy(&state, &ProxyTarget::new(provider, "v1/messages"), request).await
}

async fn proxy_count_tokens(
    State(state): State<ProxyState>,
    Path(provider): Path<String>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    let target = ProxyTarget::new(provider, "v1/messages/count_tokens");
    proxy(&state, &target, request).await
}

async fn proxy_models(
    State(state): State<ProxyState>,
    Path(provider): Path<String>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    proxy(&state, &ProxyTarget::new(provider, "v1/models"), request).await
}

async fn proxy_chat_completions(
    State(state): State<ProxyState>,
    Path(provider): Path<String>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    let target = ProxyTarget::new(provider, "v1/chat/completions");
    proxy(&state, &target, request).await
}

async fn auto_chat_completions(
    State(state): State<ProxyState>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    auto_proxy(&state, "v1/chat/completions", request).await
}

async fn auto_messages(
    State(state): State<ProxyState>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    auto_proxy(&state, "v1/messages", request).await
}

async fn auto_count_tokens(
    State(state): State<ProxyState>,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    auto_proxy(&state, "v1/messages/count_tokens", request).await
}
