//! Concurrency admission control.
//!
//! # Responsibilities
//! - Bound the number of requests being actively handled
//! - Reject excess arrivals with 503 before any other work occurs
//! - Guarantee release exactly once per admitted request
//!
//! # Design Decisions
//! - Semaphore-backed: the permit is held for the life of the request and
//!   released on drop, so admit/release symmetry holds under every
//!   control-flow exit (success, normalized error, panic unwind)
//! - No queueing: an arrival over the limit fails immediately

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::http::error::GatewayError;
use crate::observability::metrics;

/// Process-wide gate bounding concurrently-handled requests.
#[derive(Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

/// Proof of admission. Dropping it releases the slot.
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Try to admit a request. `None` means the gate is at capacity and the
    /// caller must respond 503 without doing any further work.
    pub fn try_admit(&self) -> Option<AdmissionPermit> {
        match self.permits.clone().try_acquire_owned() {
            Ok(permit) => Some(AdmissionPermit { _permit: permit }),
            Err(_) => None,
        }
    }

    /// Number of free slots. Exposed for tests and introspection.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Configured bound.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// Axum middleware enforcing admission for every inbound request.
///
/// Wired as the outermost application layer so rejected requests trigger no
/// routing, caching, or downstream calls. The permit is held across the rest
/// of the stack and dropped once the response is produced.
pub async fn admission_middleware(
    State(gate): State<AdmissionGate>,
    request: Request,
    next: Next,
) -> Response {
    let Some(_permit) = gate.try_admit() else {
        metrics::record_admission_rejection();
        tracing::warn!(
            path = %request.uri().path(),
            max_concurrent = gate.max_concurrent(),
            "Admission rejected, gate at capacity"
        );
        return GatewayError::Busy.into_response();
    };

    // Permit lives until the response (or a panic) leaves this frame.
    next.run(request).await
}
