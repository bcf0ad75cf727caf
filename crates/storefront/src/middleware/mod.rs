//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (record `x-request-id`)
//! 4. CSP nonce (per-request nonce for the inline cart script)
//! 5. Security headers (CSP, framing, sniffing)
//! 6. Session layer (in-memory `tower-sessions` store holding the cart)

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
