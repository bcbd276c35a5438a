//! Authentication middleware and extractors for admin.
//!
//! The gate is a boolean flag in the session, set by
//! the password login and cleared on logout. Any admin page load without
//! the exact `true` flag redirects to the login screen before rendering.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that requires the logged-in flag.
///
/// If the flag is absent or anything other than `true`, the request is
/// redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     _auth: RequireAdminAuth,
/// ) -> impl IntoResponse {
///     "painel"
/// }
/// ```
pub struct RequireAdminAuth;

/// Error returned when the logged-in flag is missing.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Session layer is missing entirely.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        if is_logged_in(session).await {
            Ok(Self)
        } else {
            Err(AdminAuthRejection::RedirectToLogin)
        }
    }
}

/// Check the logged-in flag. Only the exact value `true` counts.
pub async fn is_logged_in(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::ADMIN_LOGGED_IN)
        .await
        .ok()
        .flatten()
        == Some(true)
}

/// Set the logged-in flag after a successful password match.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_logged_in(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_LOGGED_IN, true).await
}

/// Clear the logged-in flag (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_logged_in(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<bool>(session_keys::ADMIN_LOGGED_IN)
        .await?;
    Ok(())
}
