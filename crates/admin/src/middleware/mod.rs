//! Middleware for the admin panel.

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, clear_logged_in, is_logged_in, set_logged_in};
pub use session::create_session_layer;
