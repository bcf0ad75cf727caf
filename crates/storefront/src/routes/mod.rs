//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Shop
//! GET  /shop                   - Product listing
//! GET  /shop/{slug}            - Product detail
//!
//! # Cart (HTMX fragments, redirects without HTMX)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add by slug (returns count badge)
//! POST /cart/update            - Change quantity by delta (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Empty cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Pages
//! GET  /contact                - Contact form
//! POST /contact                - Validate and acknowledge
//! GET  /bbqservices            - Services (?tab=catering|masterclasses|descaling)
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod services;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/{slug}", get(shop::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/shop", shop_routes())
        .nest("/cart", cart_routes())
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/bbqservices", get(services::show))
}

/// Liveness check. Does not touch the CMS.
pub async fn health() -> &'static str {
    "ok"
}
