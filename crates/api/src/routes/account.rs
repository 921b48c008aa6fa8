//! Route definitions for the `/user` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET|POST  /register  -> register_form | register
/// GET|POST  /login     -> login_form | login
/// GET|POST  /logout    -> logout (requires auth)
/// POST      /refresh   -> refresh
/// GET|POST  /update    -> profile_form | update_profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            get(account::register_form).post(account::register),
        )
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout).post(account::logout))
        .route("/refresh", post(account::refresh))
        .route(
            "/update",
            get(account::profile_form).post(account::update_profile),
        )
}
