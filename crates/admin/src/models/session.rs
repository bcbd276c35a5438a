//! Session-related types.
//!
//! The admin session stores a single boolean: the logged-in flag set by
//! the password gate. Only the exact value `true` grants access.

/// Session keys for admin data.
pub mod keys {
    /// Key for the logged-in flag.
    pub const ADMIN_LOGGED_IN: &str = "admin_logged_in";
}
