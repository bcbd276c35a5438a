//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Panel (product form + product list)
//! GET  /health                     - Health check
//!
//! # Auth
//! GET  /auth/login                 - Login page (redirects if logged in)
//! POST /auth/login                 - Password check
//! POST /auth/logout                - Clear the flag (confirm-gated)
//!
//! # Products
//! POST /products                   - Create product (multipart)
//! GET  /products/{doc_id}/edit     - Load a product into the form
//! POST /products/{doc_id}          - Update product (multipart)
//! POST /products/{doc_id}/featured - Toggle the featured flag
//! POST /products/{doc_id}/delete   - Delete product (confirm-gated)
//! ```

pub mod auth;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
}
