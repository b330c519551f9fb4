//! Typed JSON calls against a single backend service.

use axum::http::uri::{Authority, Scheme};
use serde_json::Value;
use url::Url;

use crate::config::ConfigError;
use crate::http::error::GatewayError;
use crate::observability::metrics;

/// A named backend bound to a base URL.
///
/// Used two ways: the aggregation endpoints issue JSON GETs through the
/// embedded `reqwest` client (which carries the configured per-call timeout),
/// and the generic forwarder reads the scheme/authority to rewrite inbound
/// URIs.
#[derive(Clone)]
pub struct Backend {
    name: &'static str,
    base_url: Url,
    scheme: Scheme,
    authority: Authority,
    http: reqwest::Client,
}

impl Backend {
    pub fn new(
        name: &'static str,
        base_url: Url,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let scheme = match base_url.scheme() {
            "https" => Scheme::HTTPS,
            _ => Scheme::HTTP,
        };
        let authority = base_url
            .authority()
            .parse::<Authority>()
            .map_err(|e| ConfigError::Validation(format!("invalid {name} base URL: {e}")))?;
        Ok(Self {
            name,
            base_url,
            scheme,
            authority,
            http,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Classification follows the normalizer's priority order: timeout, then
    /// a mirrored non-2xx response with its body as detail, then
    /// no-response-at-all. A 2xx body that is not JSON is a local failure.
    pub async fn get_json(&self, path: &str) -> Result<Value, GatewayError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::Unreachable {
                detail: format!("invalid path for {}: {e}", self.name),
            })?;

        tracing::debug!(backend = self.name, url = %url, "Calling backend");

        let response = self.http.get(url).send().await.map_err(|e| {
            metrics::record_upstream_error(self.name);
            GatewayError::from_reqwest(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            metrics::record_upstream_error(self.name);
            GatewayError::from_reqwest(e)
        })?;

        if !status.is_success() {
            metrics::record_upstream_error(self.name);
            let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            return Err(GatewayError::Upstream { status, body });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            metrics::record_upstream_error(self.name);
            GatewayError::Unreachable {
                detail: format!("invalid JSON from {}: {e}", self.name),
            }
        })
    }
}
