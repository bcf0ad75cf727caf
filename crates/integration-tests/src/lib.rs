//! Integration test support for the Under The Hood BBQ storefront.
//!
//! Tests run the real router in-process with `tower::ServiceExt::oneshot`
//! and point the CMS client at [`StubCms`], a small `axum` server on an
//! ephemeral port that serves fixture responses in both record shapes.
//!
//! # Test Categories
//!
//! - `cms_client` - client requests, caching and error mapping
//! - `cart_routes` - session cart flows through the HTTP layer
//! - `pages` - page rendering, fallbacks and headers

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use under_the_hood_storefront::{app, config::StorefrontConfig, state::AppState};

/// Origin that refuses connections, for "CMS down" scenarios.
pub const UNREACHABLE_CMS: &str = "http://127.0.0.1:1";

/// A request the stub CMS received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubState {
    fn record(&self, path: &str, raw_query: Option<&str>, headers: &HeaderMap) -> RecordedRequest {
        let query = raw_query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let request = RecordedRequest {
            path: path.to_string(),
            query,
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        };
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        request
    }
}

/// A fixture CMS served on `127.0.0.1` for the duration of a test.
pub struct StubCms {
    pub base_url: String,
    state: StubState,
}

impl StubCms {
    /// Bind an ephemeral port and start serving.
    pub async fn spawn() -> Self {
        let state = StubState::default();
        let router = Router::new()
            .route("/api/products", get(products))
            .route("/api/categories", get(categories))
            .route("/api/global", get(global))
            .route("/api/footer", get(footer))
            .route("/api/home", get(home))
            .route("/api/broken", get(broken))
            .route("/api/garbled", get(garbled))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub CMS");
        let addr = listener.local_addr().expect("Stub CMS has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// How many requests hit `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Flat record with image formats and nutrition.
#[must_use]
pub fn smoky_rub() -> Value {
    json!({
        "id": 1,
        "documentId": "rub-doc",
        "title": "Smoky Rub",
        "subTitle": "Low and slow",
        "slug": "smoky-rub",
        "description": "Paprika, garlic and a lot of smoke.",
        "price": 14.5,
        "colour": "#F5E6C8",
        "ingredients": "Paprika, salt, garlic",
        "category": {"id": 1, "name": "Rubs"},
        "images": [{
            "url": "/uploads/rub.png",
            "formats": {
                "thumbnail": {"url": "/uploads/thumb_rub.png", "width": 150},
                "large": {"url": "/uploads/large_rub.png", "width": 1000},
                "small": {"url": "/uploads/small_rub.png", "width": 500}
            }
        }],
        "nutrition": [{"servingSize": "5g", "energy": 120, "protein": "2.5"}]
    })
}

/// Wrapped record with art instead of images.
#[must_use]
pub fn hot_sauce() -> Value {
    json!({
        "id": 2,
        "attributes": {
            "title": "Hot Sauce",
            "slug": "hot-sauce",
            "price": "9",
            "colour": "not-a-colour!",
            "glutenFree": true,
            "veganFriendly": true,
            "category": {"data": {"id": 2, "attributes": {"name": "Sauces"}}},
            "art": {"data": {"attributes": {"url": "https://cdn.example.com/sauce.png"}}}
        }
    })
}

fn catalogue() -> Vec<Value> {
    vec![smoky_rub(), hot_sauce()]
}

fn slug_of(node: &Value) -> Option<&str> {
    node.get("slug")
        .or_else(|| node.get("attributes").and_then(|a| a.get("slug")))
        .and_then(Value::as_str)
}

async fn products(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    let request = state.record("/api/products", query.as_deref(), &headers);

    let data: Vec<Value> = if let Some(slug) = request.query.get("filters[slug][$eq]") {
        catalogue()
            .into_iter()
            .filter(|p| slug_of(p) == Some(slug.as_str()))
            .collect()
    } else if let Some(id) = request.query.get("filters[id][$eq]") {
        catalogue()
            .into_iter()
            .filter(|p| p.get("id").map(ToString::to_string).as_deref() == Some(id.as_str()))
            .collect()
    } else {
        catalogue()
    };

    Json(json!({"data": data, "meta": {"pagination": {"total": data.len()}}}))
}

async fn categories(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("/api/categories", query.as_deref(), &headers);
    Json(json!({"data": [
        {"id": 1, "attributes": {"name": "Rubs", "slug": "rubs"}},
        {"id": 2, "name": "Sauces", "slug": "sauces"}
    ]}))
}

async fn global(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("/api/global", query.as_deref(), &headers);
    Json(json!({"data": {
        "name": "Under The Hood BBQ",
        "email": "underthehoodnz@gmail.com",
        "phone": "021 242 0799",
        "logo": {"url": "/uploads/logo.png", "alternativeText": "Under The Hood logo"}
    }}))
}

async fn footer(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("/api/footer", query.as_deref(), &headers);
    Json(json!({"data": {
        "emailIcon": {"url": "/uploads/email.svg"},
        "socialLinks": [
            {"label": "Instagram", "url": "https://instagram.com/underthehoodbbq"},
            {"label": "No link"}
        ]
    }}))
}

async fn home(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("/api/home", query.as_deref(), &headers);
    Json(json!({"data": {"attributes": {"navSection": {
        "leftItems": {"data": [{"attributes": {"label": "Award winning rubs", "url": "/shop"}}]},
        "rightitems": [{"label": "Catering", "url": "/bbqservices"}],
        "image": {"data": {"attributes": {"url": "/uploads/centre.png"}}},
        "product": {"data": {"id": 2}}
    }}}}))
}

async fn broken(State(state): State<StubState>, headers: HeaderMap) -> impl IntoResponse {
    state.record("/api/broken", None, &headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "database on fire")
}

async fn garbled(State(state): State<StubState>, headers: HeaderMap) -> impl IntoResponse {
    state.record("/api/garbled", None, &headers);
    (StatusCode::OK, "{not json")
}

// =============================================================================
// Storefront helpers
// =============================================================================

/// Development config pointing at `cms_url`.
#[must_use]
pub fn test_config(cms_url: &str) -> StorefrontConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("CMS_URL", cms_url.to_string()),
        ("STOREFRONT_ENV", "development".to_string()),
    ]);
    StorefrontConfig::from_lookup(&|key| vars.get(key).cloned()).expect("Invalid test config")
}

/// The storefront router, in-process, with its own session store.
#[must_use]
pub fn test_app(cms_url: &str) -> Router {
    app(AppState::new(test_config(cms_url)))
}

/// A response with its body read to a string.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie, if one was set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|c| c.starts_with("uth_session="))
            .and_then(|c| c.split(';').next())
            .map(String::from)
    }
}

/// Drive one request through `app`.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response: Response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// A browser-ish client: remembers the session cookie between requests.
pub struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path, false).body(Body::empty());
        self.send(request.expect("Invalid request")).await
    }

    /// Form POST; `htmx` adds the `HX-Request` header.
    pub async fn post(&mut self, path: &str, form: &[(&str, &str)], htmx: bool) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let request = self
            .request("POST", path, htmx)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("Invalid request")).await
    }

    fn request(&self, method: &str, path: &str, htmx: bool) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = send(&self.app, request).await;
        if let Some(cookie) = response.session_cookie() {
            self.cookie = Some(cookie);
        }
        response
    }
}
