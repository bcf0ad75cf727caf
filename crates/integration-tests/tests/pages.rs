//! Page rendering integration tests.
//!
//! Covers:
//! - Home, shop, services and contact pages with a working CMS
//! - Fallbacks when the CMS is unreachable
//! - Security headers, CSP nonce and request id on every response

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use under_the_hood_integration_tests::{Browser, StubCms, UNREACHABLE_CMS, send, test_app};

async fn live() -> (StubCms, Browser) {
    let cms = StubCms::spawn().await;
    let browser = Browser::new(test_app(&cms.base_url));
    (cms, browser)
}

fn offline() -> Browser {
    Browser::new(test_app(UNREACHABLE_CMS))
}

// =============================================================================
// Home
// =============================================================================

#[tokio::test]
async fn test_home_renders_cms_content() {
    let (_cms, mut browser) = live().await;

    let page = browser.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Award winning rubs"));
    assert!(page.body.contains("Catering"));
    assert!(page.body.contains("Hot Sauce"));
    assert!(page.body.contains("Vegan Friendly"));
    assert!(page.body.contains("021 242 0799"));
}

#[tokio::test]
async fn test_home_with_cms_down_uses_fallbacks() {
    let mut browser = offline();

    let page = browser.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("AWARD WINNING"));
    assert!(page.body.contains("Under The Hood BBQ"));
    assert!(!page.body.contains(r#"class="feature""#));
}

// =============================================================================
// Shop
// =============================================================================

#[tokio::test]
async fn test_shop_lists_products() {
    let (_cms, mut browser) = live().await;

    let page = browser.get("/shop").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"href="/shop/smoky-rub""#));
    assert!(page.body.contains(r#"href="/shop/hot-sauce""#));
    assert!(page.body.contains("$14.50"));
}

#[tokio::test]
async fn test_shop_with_cms_down_is_empty() {
    let page = offline().get("/shop").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No products to show right now."));
}

#[tokio::test]
async fn test_product_page() {
    let (_cms, mut browser) = live().await;

    let page = browser.get("/shop/smoky-rub").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Smoky Rub"));
    assert!(page.body.contains("Paprika, salt, garlic"));
    assert!(page.body.contains("$14.50"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (_cms, mut browser) = live().await;

    let page = browser.get("/shop/unknown").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Page not found"));
}

#[tokio::test]
async fn test_product_page_with_cms_down_is_not_found() {
    let page = offline().get("/shop/smoky-rub").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Services
// =============================================================================

#[tokio::test]
async fn test_services_tabs() {
    let mut browser = offline();

    let page = browser.get("/bbqservices?tab=masterclasses").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h2>BBQ Classes</h2>"));

    let page = browser.get("/bbqservices?tab=nonsense").await;
    assert!(page.body.contains("<h2>Catering</h2>"));

    let page = browser.get("/bbqservices").await;
    assert!(page.body.contains("<h2>Catering</h2>"));
}

// =============================================================================
// Contact
// =============================================================================

#[tokio::test]
async fn test_contact_validation_keeps_values() {
    let mut browser = offline();

    let page = browser
        .post(
            "/contact",
            &[("name", ""), ("email", "not-an-email"), ("message", "Brisket for 30")],
            false,
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Please enter your name."));
    assert!(page.body.contains("Please enter a valid email."));
    assert!(!page.body.contains("Please enter a message."));
    assert!(page.body.contains("Brisket for 30"));
    assert!(page.body.contains(r#"value="not-an-email""#));
}

#[tokio::test]
async fn test_contact_success_clears_form() {
    let mut browser = offline();

    let page = browser
        .post(
            "/contact",
            &[
                ("name", "Sam"),
                ("email", "sam@example.co.nz"),
                ("phone", "021 000 000"),
                ("message", "Brisket for 30"),
            ],
            false,
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("get back to you soon"));
    assert!(!page.body.contains("Brisket for 30"));
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_security_headers() {
    let (cms, mut browser) = live().await;

    let page = browser.get("/shop").await;

    assert_eq!(page.header("x-frame-options"), Some("DENY"));
    assert_eq!(page.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(
        page.header("referrer-policy"),
        Some("strict-origin-when-cross-origin")
    );

    let csp = page.header("content-security-policy").unwrap();
    assert!(csp.contains("'nonce-"));
    assert!(csp.contains("https://unpkg.com"));
    assert!(csp.contains(&cms.base_url));
}

#[tokio::test]
async fn test_nonce_matches_inline_script() {
    let mut browser = offline();

    let page = browser.get("/contact").await;

    let csp = page.header("content-security-policy").unwrap();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();
    assert!(page.body.contains(&format!(r#"nonce="{nonce}""#)));

    let again = browser.get("/contact").await;
    assert!(!again.body.contains(&format!(r#"nonce="{nonce}""#)));
}

#[tokio::test]
async fn test_health_carries_request_id() {
    let mut browser = offline();

    let page = browser.get("/health").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
    assert!(page.header("x-request-id").is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let app = test_app(UNREACHABLE_CMS);

    let request = Request::get("/health")
        .header("x-request-id", "edge-42")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.header("x-request-id"), Some("edge-42"));

    let request = Request::get("/health")
        .header("x-request-id", "not ok")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_ne!(response.header("x-request-id"), Some("not ok"));
}
