//! Authentication route handlers for admin.
//!
//! A single plain-text password guards the panel. Matching sets the
//! session flag and shows a short success state before redirecting;
//! mismatching clears the field and shows a transient error. There is no
//! lockout, rate limiting or hashing; the panel fronts a one-person shop.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::{clear_logged_in, is_logged_in, set_logged_in};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    /// Show the transient wrong-password error.
    error: bool,
    /// Show the success state; the page meta-refreshes to the panel.
    success: bool,
}

/// Login form data. No `Debug` derive: the password must never land in
/// logs.
#[derive(Deserialize)]
pub struct LoginForm {
    senha: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login - already-flagged sessions skip straight to the panel.
#[instrument(skip(session))]
async fn login_page(session: Session) -> Response {
    if is_logged_in(&session).await {
        return Redirect::to("/").into_response();
    }

    render(LoginPageTemplate {
        error: false,
        success: false,
    })
}

/// Check the password.
///
/// POST /auth/login
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.senha == state.config().admin_password.expose_secret() {
        if let Err(e) = set_logged_in(&session).await {
            tracing::error!("Failed to set login flag: {e}");
            return render(LoginPageTemplate {
                error: true,
                success: false,
            });
        }
        tracing::info!("admin login");
        render(LoginPageTemplate {
            error: false,
            success: true,
        })
    } else {
        tracing::warn!("admin login with wrong password");
        render(LoginPageTemplate {
            error: true,
            success: false,
        })
    }
}

/// Logout and clear the session flag.
///
/// POST /auth/logout - the confirmation gate runs client-side.
#[instrument(skip(session))]
async fn logout(session: Session) -> impl IntoResponse {
    let _ = clear_logged_in(&session).await;
    Redirect::to("/auth/login")
}

fn render(template: LoginPageTemplate) -> Response {
    Html(
        template
            .render()
            .unwrap_or_else(|_| String::from("Error rendering template")),
    )
    .into_response()
}
