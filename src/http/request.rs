//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique `x-request-id` (UUID v4) for every inbound request
//! - Keep a client-supplied `x-request-id` untouched
//! - Open the per-request tracing span that carries the id
//!
//! # Design Decisions
//! - Request ID added as early as possible so every log line of the
//!   request can be correlated by the aggregation pipeline

use axum::{body::Body, http::Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Produces UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Span wrapping one request, tagged with its id.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
