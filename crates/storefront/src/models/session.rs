//! Session-related types.
//!
//! The storefront session stores exactly one value: the visitor's cart.

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the visitor's cart.
    pub const CART: &str = "cart";
}
