//! Request ID middleware.
//!
//! Reuses an upstream `x-request-id` when it looks like an id, otherwise
//! generates a UUID v4. The id is recorded on the tracing span, tagged on the
//! Sentry scope, and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_LEN: usize = 128;

/// An upstream id is kept only if it is short, non-empty and made of
/// `[A-Za-z0-9._-]`, so it is safe to echo and to use as a Sentry tag.
fn upstream_id(value: &str) -> Option<&str> {
    let ok = !value.is_empty()
        && value.len() <= MAX_UPSTREAM_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    ok.then_some(value)
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
