//! Forwarding a request to a named provider.
//!
//! Request headers are copied except for those the outbound client owns.
//! The upstream response is streamed back with its status and headers; only
//! connection-level framing headers are left to our own server.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::{HeaderMap, HeaderName, HeaderValue, Method, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use llmux_core::ProxyTarget;

use crate::error::ProxyError;
use crate::state::ProxyState;
use crate::tee::tee;

/// Request headers that are not copied to the upstream request.
///
/// The client recomputes the length and framing of the buffered body.
const SKIPPED_REQUEST_HEADERS: &[&str] =
    &["host", "content-length", "transfer-encoding", "connection"];

/// Upstream response headers left to our own connection framing.
const SKIPPED_RESPONSE_HEADERS: &[&str] = &["connection", "keep-alive", "transfer-encoding"];

fn should_forward_request_header(name: &HeaderName) -> bool {
    !SKIPPED_REQUEST_HEADERS.contains(&name.as_str())
}

fn should_mirror_response_header(name: &HeaderName) -> bool {
    !SKIPPED_RESPONSE_HEADERS.contains(&name.as_str())
}

/// Everything forwarded from the caller's request.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub body: Bytes,
}

impl ForwardRequest {
    /// Parse the body as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

impl<S> FromRequest<S> for ForwardRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let headers = req.headers().clone();
        let query = req.uri().query().map(ToOwned::to_owned);
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self {
            method,
            headers,
            query,
            body,
        })
    }
}

/// Forward `request` to `target` and stream the upstream response back.
///
/// Conversation paths are wired through the transcript tee.
pub async fn proxy(
    state: &ProxyState,
    target: &ProxyTarget,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    let provider = state.registry.resolve(&target.provider)?;
    let url = provider.upstream_url(&target.upstream_path, request.query.as_deref());
    let started = Instant::now();

    let mut headers = HeaderMap::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        if should_forward_request_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    if let Some(bearer) = provider.bearer() {
        let value = HeaderValue::from_str(&bearer)
            .map_err(|e| ProxyError::Internal(format!("invalid auth token: {e}")))?;
        headers.insert(header::AUTHORIZATION, value);
    }

    // Only conversation bodies are parsed; everything else stays opaque bytes.
    let request_json = if target.is_conversation() {
        request.json_body()
    } else {
        None
    };

    debug!(
        provider = %provider.name,
        method = %request.method,
        url = %url,
        "Forwarding request"
    );

    let upstream = state
        .client
        .request(request.method.clone(), &url)
        .headers(headers)
        .body(request.body)
        .send()
        .await
        .map_err(|e| {
            if e.is_builder() {
                ProxyError::Internal(e.to_string())
            } else {
                ProxyError::BadGateway(e.to_string())
            }
        })?;

    let status = upstream.status();
    info!(
        provider = %provider.name,
        method = %request.method,
        path = %target.upstream_path,
        status = status.as_u16(),
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Proxied request"
    );

    let mut response_headers = HeaderMap::with_capacity(upstream.headers().len());
    for (name, value) in upstream.headers() {
        if should_mirror_response_header(name) {
            response_headers.append(name.clone(), value.clone());
        }
    }

    let body = if target.is_conversation() {
        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let content_length = upstream.content_length();
        Body::from_stream(tee(
            upstream.bytes_stream(),
            request_json.as_ref(),
            content_type.as_deref(),
            content_length,
            Arc::clone(&state.store),
        ))
    } else {
        Body::from_stream(upstream.bytes_stream())
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_header_filter() {
        assert!(should_forward_request_header(&header::ACCEPT));
        assert!(should_forward_request_header(&header::AUTHORIZATION));
        assert!(should_forward_request_header(&HeaderName::from_static(
            "anthropic-version"
        )));

        assert!(!should_forward_request_header(&header::HOST));
        assert!(!should_forward_request_header(&header::CONTENT_LENGTH));
    }

    #[test]
    fn response_header_filter() {
        assert!(should_mirror_response_header(&header::CONTENT_TYPE));
        assert!(should_mirror_response_header(&HeaderName::from_static(
            "x-request-id"
        )));

        assert!(!should_mirror_response_header(&header::CONNECTION));
        assert!(!should_mirror_response_header(&header::TRANSFER_ENCODING));
        assert!(!should_mirror_response_header(&HeaderName::from_static(
            "keep-alive"
        )));
    }

    #[tokio::test]
    async fn extractor_captures_query_and_body() {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/proxy/a/v1/messages?beta=true&x=1")
            .header("x-api-key", "k")
            .body(Body::from("{\"a\":1}"))
            .unwrap();

        let forwarded = ForwardRequest::from_request(req, &()).await.unwrap();
        assert_eq!(forwarded.method, Method::POST);
        assert_eq!(forwarded.query.as_deref(), Some("beta=true&x=1"));
        assert_eq!(forwarded.headers["x-api-key"], "k");
        assert_eq!(forwarded.json_body(), Some(serde_json::json!({ "a": 1 })));
    }
}
