//! Generic request forwarding.
//!
//! # Responsibilities
//! - Strip the routing prefix (`/nba`, `/recipes`) from the inbound path
//! - Rewrite scheme and authority to the bound backend
//! - Relay method, headers, and body; relay downstream status and body back
//!   verbatim
//!
//! # Design Decisions
//! - Forwarded traffic may be non-idempotent, so there are no retries and
//!   these responses are never cached
//! - The body is streamed through untouched; an absent body forwards as an
//!   empty body, never a fabricated payload
//! - Each call carries the configured per-call timeout; exceeding it maps to
//!   a normalized 408

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::http::uri::{PathAndQuery, Uri};
use axum::http::Request;
use axum::response::Response;

use crate::http::error::GatewayError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::backend::Backend;

/// Hop-by-hop headers that must not be relayed.
const HOP_BY_HOP_HEADERS: [&str; 6] = [
    "connection",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// `/nba/*` → sports backend.
pub async fn forward_to_sports(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let backend = state.sports.clone();
    forward(&state, "/nba", &backend, request).await
}

/// `/recipes/*` → recipes backend.
pub async fn forward_to_recipes(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let backend = state.recipes.clone();
    forward(&state, "/recipes", &backend, request).await
}

async fn forward(
    state: &AppState,
    prefix: &str,
    backend: &Backend,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let rewritten = rewrite_path_and_query(&parts.uri, prefix);
    let path_and_query: PathAndQuery =
        rewritten
            .parse()
            .map_err(|e| GatewayError::Unreachable {
                detail: format!("rewritten path is invalid: {e}"),
            })?;

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(backend.scheme().clone());
    uri_parts.authority = Some(backend.authority().clone());
    uri_parts.path_and_query = Some(path_and_query);
    let uri = Uri::from_parts(uri_parts).map_err(|e| GatewayError::Unreachable {
        detail: format!("failed to build upstream URI: {e}"),
    })?;

    tracing::debug!(
        backend = backend.name(),
        method = %parts.method,
        uri = %uri,
        "Forwarding request"
    );

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            // Host belongs to the new authority; the rest relays verbatim.
            if name == header::HOST || is_hop_by_hop(name) {
                continue;
            }
            headers.insert(name.clone(), value.clone());
        }
    }
    let upstream_request = builder.body(body).map_err(|e| GatewayError::Unreachable {
        detail: format!("failed to build upstream request: {e}"),
    })?;

    let outcome =
        tokio::time::timeout(state.upstream_timeout, state.forward_client.request(upstream_request))
            .await;

    match outcome {
        Ok(Ok(response)) => {
            let (parts, body) = response.into_parts();
            Ok(Response::from_parts(parts, Body::new(body)))
        }
        Ok(Err(e)) => {
            metrics::record_upstream_error(backend.name());
            Err(GatewayError::Unreachable {
                detail: e.to_string(),
            })
        }
        Err(_) => {
            metrics::record_upstream_error(backend.name());
            Err(GatewayError::Timeout {
                detail: format!(
                    "forwarded call to {} exceeded {}ms",
                    backend.name(),
                    state.upstream_timeout.as_millis()
                ),
            })
        }
    }
}

/// Strip `prefix` from the path, keeping the query string. An empty remainder
/// forwards to the backend root; the backend's own routing decides validity.
fn rewrite_path_and_query(uri: &Uri, prefix: &str) -> String {
    let path = uri.path();
    let remainder = path.strip_prefix(prefix).unwrap_or(path);
    let remainder = if remainder.is_empty() { "/" } else { remainder };
    match uri.query() {
        Some(query) => format!("{remainder}?{query}"),
        None => remainder.to_string(),
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn strips_prefix_and_keeps_remainder() {
        assert_eq!(
            rewrite_path_and_query(&uri("/nba/getTeamInfo/5"), "/nba"),
            "/getTeamInfo/5"
        );
        assert_eq!(
            rewrite_path_and_query(&uri("/recipes/getRecipes"), "/recipes"),
            "/getRecipes"
        );
    }

    #[test]
    fn bare_prefix_forwards_to_root() {
        assert_eq!(rewrite_path_and_query(&uri("/nba"), "/nba"), "/");
    }

    #[test]
    fn query_string_is_preserved() {
        assert_eq!(
            rewrite_path_and_query(&uri("/nba/getAllPlayers?page=2&size=10"), "/nba"),
            "/getAllPlayers?page=2&size=10"
        );
    }

    #[test]
    fn hop_by_hop_headers_are_dropped() {
        assert!(is_hop_by_hop(&HeaderName::from_static("connection")));
        assert!(is_hop_by_hop(&HeaderName::from_static("transfer-encoding")));
        assert!(!is_hop_by_hop(&HeaderName::from_static("content-type")));
    }
}
