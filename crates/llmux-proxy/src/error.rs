//! Gateway error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use llmux_core::UnknownProvider;

use crate::models::{ErrorResponse, GatewayErrorBody};

/// Message returned with every 502.
pub const NO_UPSTREAM_RESPONSE: &str = "No response received from upstream server";

/// Errors produced by the gateway before an upstream response exists.
///
/// Once upstream has answered, its status and body are mirrored instead.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),

    #[error("Invalid or missing model")]
    InvalidModel { available: Vec<String> },

    #[error("Upstream request failed: {0}")]
    BadGateway(String),

    #[error("Failed to build upstream request: {0}")]
    Internal(String),
}

impl ProxyError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnknownProvider(_) | Self::InvalidModel { .. } => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::UnknownProvider(e) => {
                warn!(requested = %e.requested, "Unknown provider");
                (status, Json(GatewayErrorBody::new(e.to_string()))).into_response()
            }
            Self::InvalidModel { available } => {
                (status, Json(ErrorResponse::invalid_model(&available))).into_response()
            }
            Self::BadGateway(detail) => {
                error!(error = %detail, "No response from upstream");
                (
                    status,
                    Json(GatewayErrorBody::new("Bad Gateway").with_message(NO_UPSTREAM_RESPONSE)),
                )
                    .into_response()
            }
            Self::Internal(detail) => {
                error!(error = %detail, "Failed to build upstream request");
                (
                    status,
                    Json(GatewayErrorBody::new("Internal Server Error").with_message(detail)),
                )
                    .into_response()
            }
        }
    }
}
