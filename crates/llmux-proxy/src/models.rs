//! Response body models for the gateway's own endpoints.
//!
//! Upstream bodies are never modelled here: they are passed through as bytes.
//! These types cover error bodies, the health check and the aggregated model
//! listings.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching the OpenAI format.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
            },
        }
    }

    /// Create an error response for a model string that does not name a
    /// configured provider.
    pub fn invalid_model(available: &[String]) -> Self {
        Self::new(
            format!(
                "Invalid or missing model. Expected format: \"provider/modelName\". Available providers: {}",
                available.join(", ")
            ),
            "invalid_request_error",
        )
    }
}

/// Flat error body used for gateway-level failures
/// (`{"error": "...", "message": "..."}`).
#[derive(Debug, Clone, Serialize)]
pub struct GatewayErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GatewayErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Aggregated Model Listings
// =============================================================================

/// Body of `GET /models`: one entry per configured provider.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsOverview {
    pub timestamp: DateTime<Utc>,
    /// Serialized as an object keyed by provider name, in configuration order.
    #[serde(serialize_with = "serialize_by_provider")]
    pub providers: Vec<ProviderListing>,
}

fn serialize_by_provider<S: Serializer>(
    listings: &[ProviderListing],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(listings.len()))?;
    for listing in listings {
        map.serialize_entry(&listing.provider, listing)?;
    }
    map.end()
}

/// Result of listing one provider's models.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderListing {
    pub provider: String,
    #[serde(flatten)]
    pub outcome: ListingOutcome,
}

/// Per-provider success or failure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ListingOutcome {
    Success {
        data: Value,
    },
    Error {
        error: String,
        #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

/// Body of `GET /auto/v1/models`: every provider's models, id-prefixed.
#[derive(Debug, Clone, Serialize)]
pub struct PrefixedModels {
    pub object: &'static str,
    pub data: Vec<Value>,
}

impl PrefixedModels {
    pub const fn new(data: Vec<Value>) -> Self {
        Self {
            object: "list",
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overview_serializes_as_map_keyed_by_provider() {
        let overview = ModelsOverview {
            timestamp: Utc::now(),
            providers: vec![
                ProviderListing {
                    provider: "b".into(),
                    outcome: ListingOutcome::Success {
                        data: json!({ "data": [] }),
                    },
                },
                ProviderListing {
                    provider: "a".into(),
                    outcome: ListingOutcome::Error {
                        error: "timed out".into(),
                        status_code: None,
                    },
                },
            ],
        };

        let value = serde_json::to_value(&overview).unwrap();
        assert_eq!(
            value["providers"]["b"],
            json!({ "provider": "b", "status": "success", "data": { "data": [] } })
        );
        assert_eq!(
            value["providers"]["a"],
            json!({ "provider": "a", "status": "error", "error": "timed out" })
        );
        let keys: Vec<_> = value["providers"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn error_outcome_includes_status_code_when_known() {
        let outcome = ListingOutcome::Error {
            error: "HTTP status client error (401 Unauthorized)".into(),
            status_code: Some(401),
        };
        assert_eq!(serde_json::to_value(&outcome).unwrap()["statusCode"], 401);
    }

    #[test]
    fn invalid_model_message_lists_providers() {
        let body = ErrorResponse::invalid_model(&["zai".into(), "anthropic".into()]);
        assert_eq!(body.error.r#type, "invalid_request_error");
        assert!(body.error.message.ends_with("Available providers: zai, anthropic"));
    }
}
