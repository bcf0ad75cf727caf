//! Under The Hood BBQ storefront library.
//!
//! Server-rendered site for the business: home, shop, cart, contact and
//! services pages, with all content read from a headless CMS. The binary in
//! `main.rs` adds static files, request tracing and Sentry on top of
//! [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_session;
pub mod cms;
pub mod config;
pub mod error;
pub mod filters;
pub mod layout;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};

use crate::middleware::{
    create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Layers, outermost first: request id, CSP nonce, security headers,
/// session.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes::routes()
        .layer(session_layer)
        .layer(from_fn_with_state(state.clone(), security_headers_middleware))
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
