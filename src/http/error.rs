//! Error normalization.
//!
//! Every failure that crosses the gateway's outbound boundary is converted
//! into a uniform `{"message": ..., "error": ...}` JSON envelope with a
//! deterministic status code. No raw connection errors or downstream stack
//! traces ever reach the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Normalized gateway error.
///
/// Downstream failures are classified in priority order: timeout, then
/// responded-with-error, then no-response-at-all. `NotFound` and `Busy` are
/// produced locally (aggregation logic and the admission gate) but render
/// through the same envelope.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The downstream call did not complete within the configured deadline.
    #[error("A timeout occurred: {detail}")]
    Timeout { detail: String },

    /// The downstream service responded with a non-success status.
    /// The status is mirrored and the body relayed as the error detail.
    #[error("upstream responded with status {status}")]
    Upstream { status: StatusCode, body: Value },

    /// No response at all (connection refused, DNS failure, malformed reply).
    #[error("upstream unreachable: {detail}")]
    Unreachable { detail: String },

    /// Locally-produced 404 from aggregation logic.
    #[error("{message}")]
    NotFound { message: String },

    /// Rejected by the admission gate before any work was done.
    #[error("server at capacity")]
    Busy,
}

impl GatewayError {
    /// Classify a failed `reqwest` call.
    ///
    /// Non-2xx responses never surface as `reqwest::Error` here (the backend
    /// client inspects statuses itself), so this only distinguishes timeouts
    /// from transport-level failures.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                detail: err.to_string(),
            }
        } else {
            Self::Unreachable {
                detail: err.to_string(),
            }
        }
    }

    /// Locally-produced 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// HTTP status for the normalized response.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::Upstream { status, .. } => *status,
            Self::Unreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Busy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Human-readable `message` field of the envelope.
    pub fn message(&self) -> String {
        match self {
            Self::Timeout { detail } => format!("A timeout occurred: {detail}"),
            Self::Upstream { .. } | Self::Unreachable { .. } => {
                "Error forwarding the request".to_string()
            }
            Self::NotFound { message } => message.clone(),
            Self::Busy => "Server busy, please try again later.".to_string(),
        }
    }

    /// `error` field of the envelope: the downstream body when one exists,
    /// the local failure message otherwise, `null` for locally-produced
    /// rejections.
    pub fn detail(&self) -> Value {
        match self {
            Self::Timeout { detail } => Value::String(detail.clone()),
            Self::Upstream { body, .. } => body.clone(),
            Self::Unreachable { detail } => Value::String(detail.clone()),
            Self::NotFound { .. } | Self::Busy => Value::Null,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::NotFound { .. } | Self::Busy => {
                tracing::debug!(status = %status, error = %self, "Request rejected");
            }
            _ => {
                tracing::error!(status = %status, error = %self, "Downstream failure");
            }
        }

        let body = json!({
            "message": self.message(),
            "error": self.detail(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn envelope(err: GatewayError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn timeout_maps_to_408_with_prefixed_message() {
        let (status, body) = envelope(GatewayError::Timeout {
            detail: "deadline elapsed".into(),
        })
        .await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body["message"],
            json!("A timeout occurred: deadline elapsed")
        );
        assert_eq!(body["error"], json!("deadline elapsed"));
    }

    #[tokio::test]
    async fn upstream_status_is_mirrored_with_body_detail() {
        let (status, body) = envelope(GatewayError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: json!({"error": "Team not found"}),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Error forwarding the request"));
        assert_eq!(body["error"]["error"], json!("Team not found"));
    }

    #[tokio::test]
    async fn unreachable_maps_to_500() {
        let (status, body) = envelope(GatewayError::Unreachable {
            detail: "connection refused".into(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("connection refused"));
    }

    #[tokio::test]
    async fn busy_uses_the_same_envelope_shape() {
        let (status, body) = envelope(GatewayError::Busy).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["message"],
            json!("Server busy, please try again later.")
        );
        assert_eq!(body["error"], Value::Null);
    }
}
