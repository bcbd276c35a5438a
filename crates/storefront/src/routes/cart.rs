//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session; every mutation saves it
//! back and fires a `cart-updated` trigger so the badge and the drawer
//! refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use maos_de_fada_core::cart::{Cart, CartLine, clamp_quantity};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::services::whatsapp;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub quantity: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: format!("R$ {:.2}", cart.total()),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name.clone(),
            price: line.price.display(),
            image: line.image.as_ref().map(|img| img.as_str().to_owned()),
            quantity: line.quantity,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, empty when absent.
pub async fn session_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Save the cart back to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub index: usize,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart drawer contents fragment template (for HTMX).
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

/// Add-to-cart feedback fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/added_flash.html")]
pub struct AddedFlashTemplate {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart drawer contents fragment.
#[instrument(skip(session))]
pub async fn items(session: Session) -> CartItemsTemplate {
    let cart = session_cart(&session).await;
    CartItemsTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add an item to the cart (HTMX).
///
/// The product is resolved from the catalog store by business id; the
/// cart line itself is keyed by product name. Returns a feedback flash
/// and triggers `cart-updated` so the badge and drawer refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = clamp_quantity(form.quantity.unwrap_or(1));

    let products = state.catalog().fetch_products().await?;
    let product = products
        .iter()
        .find(|p| p.id.as_i64() == form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("produto {}", form.product_id)))?;

    let mut cart = session_cart(&session).await;
    cart.add_with_quantity(
        &product.name,
        product.price,
        product.first_image().cloned(),
        quantity,
    );
    save_cart(&session, &cart).await?;

    let message = if quantity == 1 {
        format!("✅ {} adicionado ao carrinho!", product.name)
    } else {
        format!("✅ {quantity}x {} adicionados ao carrinho!", product.name)
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        AddedFlashTemplate { message },
    )
        .into_response())
}

/// Change a line quantity by a delta (HTMX).
///
/// A quantity that drops to zero removes the line entirely.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = session_cart(&session).await;
    cart.change_quantity(form.index, form.delta);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove a line from the cart (HTMX).
///
/// The yes/no confirmation gate runs client-side (`hx-confirm`) before
/// this handler is ever reached.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = session_cart(&session).await;
    cart.remove_line(form.index);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Cart count badge fragment (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let cart = session_cart(&session).await;
    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Hand the order off to WhatsApp.
///
/// An empty cart produces no outbound hand-off: the visitor is bounced
/// back to the catalog with a warning banner instead.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Redirect {
    let cart = session_cart(&session).await;

    if cart.is_empty() {
        let warning = urlencoding::encode("Carrinho vazio! Adicione produtos antes de finalizar.");
        return Redirect::to(&format!("/?aviso={warning}"));
    }

    let url = whatsapp::checkout_url(&state.config().whatsapp_number, &cart);
    Redirect::to(&url)
}
