//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Catalog page (grid, filters, cart drawer)
//! GET  /health          - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart            - Cart drawer contents fragment
//! POST /cart/add        - Add to cart (returns flash, triggers cart-updated)
//! POST /cart/update     - Change a line quantity by a delta
//! POST /cart/remove     - Remove a line (hx-confirm gated)
//! GET  /cart/count      - Cart count badge fragment
//!
//! # Checkout
//! GET  /checkout        - Redirect to the WhatsApp hand-off URL
//! ```

pub mod cart;
pub mod catalog;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::items))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(catalog::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout hand-off
        .route("/checkout", get(cart::checkout))
}
