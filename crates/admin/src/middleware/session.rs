//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The admin session
//! holds only the logged-in flag; there is no expiry beyond process
//! lifetime, matching the explicit-logout-only contract.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "mdf_admin_session";

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        // The flag never expires on its own; logout clears it
        .with_expiry(Expiry::OnSessionEnd)
        // TLS termination happens at the front proxy
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
