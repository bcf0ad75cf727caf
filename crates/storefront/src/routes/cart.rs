//! Cart route handlers.
//!
//! The cart lives in the session (see [`crate::cart_session`]). Mutations
//! answer HTMX requests with a fragment plus an `HX-Trigger: cart-updated`
//! header so the nav badge refreshes; plain form posts redirect to `/cart`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};
use under_the_hood_core::types::price::format_nzd;
use under_the_hood_core::{Cart, CartLineItem, ProductId};

use crate::cart_session::{CartSignal, SessionCart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::layout::Layout;
use crate::state::AppState;

const HX_REQUEST: &str = "hx-request";
const HX_TRIGGER: &str = "hx-trigger";

/// Form value prefixes that keep numeric and document ids apart.
const NUMBER_ID_PREFIX: &str = "n:";
const TEXT_ID_PREFIX: &str = "t:";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    /// Value posted back by the line's update and remove forms.
    pub form_id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: Option<String>,
    pub line_total: String,
}

impl From<&CartLineItem> for CartLineView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            form_id: form_id(&item.id),
            title: item.title.clone(),
            slug: item.slug.clone(),
            category: item.category.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price.map(|p| p.display()),
            line_total: format_nzd(item.line_total()),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            subtotal: format_nzd(cart.subtotal()),
            count: cart.count(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    /// Raw field text; see [`add_quantity`].
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Quantity for an add-to-cart post.
///
/// A missing, blank, non-numeric or non-positive value adds one item; a
/// value too large for `u32` is clamped.
fn add_quantity(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return 1;
    };
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

/// Form value for a line id, tagged with its kind.
fn form_id(id: &ProductId) -> String {
    match id {
        ProductId::Number(n) => format!("{NUMBER_ID_PREFIX}{n}"),
        ProductId::Text(t) => format!("{TEXT_ID_PREFIX}{t}"),
    }
}

/// The id of the cart line whose form value is `raw`.
///
/// Tagged values (`n:1`, `t:1`) name exactly one line. An untagged value
/// falls back to the first line whose displayed id matches.
fn line_id(cart: &Cart, raw: &str) -> Option<ProductId> {
    let raw = raw.trim();
    let tagged = if let Some(n) = raw.strip_prefix(NUMBER_ID_PREFIX) {
        Some(n.parse::<i64>().ok().map(ProductId::Number))
    } else {
        raw.strip_prefix(TEXT_ID_PREFIX)
            .map(|t| Some(ProductId::Text(t.to_string())))
    };

    match tagged {
        Some(id) => id.and_then(|id| cart.get(&id)).map(|item| item.id.clone()),
        None => cart
            .items()
            .iter()
            .find(|item| item.id.to_string() == raw)
            .map(|item| item.id.clone()),
    }
}

/// Answer a mutation: `fragment` plus `HX-Trigger` for HTMX, else a redirect.
fn respond(headers: &HeaderMap, signal: Option<&CartSignal>, fragment: impl IntoResponse) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    let mut response = fragment.into_response();
    if let Some(signal) = signal {
        match HeaderValue::from_str(&signal.hx_trigger()) {
            Ok(value) => {
                response.headers_mut().insert(HX_TRIGGER, value);
            }
            Err(e) => warn!(error = %e, "Cart trigger is not a valid header value"),
        }
    }
    response
}

/// Display cart page.
#[instrument(skip(session, layout))]
pub async fn show(session: Session, layout: Layout) -> impl IntoResponse {
    let cart = SessionCart::open(session).await;
    CartShowTemplate {
        layout: layout.page("Cart"),
        cart: CartView::from(cart.cart()),
    }
}

/// Add a product by slug.
///
/// The product is looked up in the CMS so the line snapshot carries the
/// current title, price and image.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown slug and `AppError::Cms` if
/// the CMS can't be reached.
#[instrument(skip(state, headers, session))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let slug = form.slug.trim();
    let item = state
        .cms()
        .product_by_slug(slug)
        .await?
        .and_then(|product| product.to_line_item())
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    add_breadcrumb("cart", "Added to cart", Some(&[("slug", slug)]));

    let mut cart = SessionCart::open(session).await;
    cart.store().add(item, add_quantity(form.quantity.as_deref()));
    let (cart, signal) = cart.save().await;

    Ok(respond(
        &headers,
        signal.as_ref(),
        CartCountTemplate {
            count: cart.count(),
        },
    ))
}

/// Change a line's quantity by `delta` (never below 1).
#[instrument(skip(headers, session))]
pub async fn update(
    headers: HeaderMap,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let mut cart = SessionCart::open(session).await;
    if let Some(id) = line_id(cart.cart(), &form.id) {
        cart.store().set_quantity(&id, form.delta);
    }
    let (cart, signal) = cart.save().await;

    respond(
        &headers,
        signal.as_ref(),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Remove a line.
#[instrument(skip(headers, session))]
pub async fn remove(
    headers: HeaderMap,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut cart = SessionCart::open(session).await;
    if let Some(id) = line_id(cart.cart(), &form.id) {
        cart.store().remove(&id);
    }
    let (cart, signal) = cart.save().await;

    respond(
        &headers,
        signal.as_ref(),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Empty the cart.
#[instrument(skip(headers, session))]
pub async fn clear(headers: HeaderMap, session: Session) -> Response {
    let mut cart = SessionCart::open(session).await;
    cart.store().clear();
    let (cart, signal) = cart.save().await;

    respond(
        &headers,
        signal.as_ref(),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = SessionCart::open(session).await;
    CartCountTemplate {
        count: cart.cart().count(),
    }
}
