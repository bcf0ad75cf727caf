//! Security headers middleware.
//!
//! Starts locked down and loosens only where the site needs it: images from
//! the CMS origin, HTMX from its CDN, and inline `<script>`/`<style>` blocks
//! that carry the request nonce.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use super::CspNonce;
use crate::state::AppState;

/// Origin HTMX is loaded from.
pub const HTMX_ORIGIN: &str = "https://unpkg.com";

/// Policy used when the dynamic one can't be encoded as a header value.
const FALLBACK_POLICY: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self'; \
     connect-src 'self'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// `scheme://host[:port]` of the CMS, or `None` if it doesn't parse.
#[must_use]
pub fn media_origin(cms_base_url: &str) -> Option<String> {
    let url = Url::parse(cms_base_url).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Build the `Content-Security-Policy` value.
#[must_use]
pub fn content_security_policy(nonce: &str, media_origin: Option<&str>) -> String {
    let (script_src, style_src) = if nonce.is_empty() {
        (format!("'self' {HTMX_ORIGIN}"), "'self'".to_string())
    } else {
        (
            format!("'self' 'nonce-{nonce}' {HTMX_ORIGIN}"),
            format!("'self' 'nonce-{nonce}'"),
        )
    };
    let img_src = media_origin.map_or_else(
        || "'self' data:".to_string(),
        |origin| format!("'self' data: {origin}"),
    );

    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src {style_src}; \
         font-src 'self'; \
         img-src {img_src}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying device features
/// - `Cross-Origin-Opener-Policy: same-origin`
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map(|n| n.value().to_string())
        .unwrap_or_default();
    let origin = media_origin(state.cms().base_url());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    let policy = content_security_policy(&nonce, origin.as_deref());
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_str(&policy).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to static CSP");
            HeaderValue::from_static(FALLBACK_POLICY)
        }),
    );

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             camera=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(), \
             usb=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}
