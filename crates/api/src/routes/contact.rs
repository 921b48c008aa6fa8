//! Route definitions for the contact directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// ```text
/// GET       /                        -> index
/// GET       /contacts                -> index
/// GET       /contacts/search         -> search
/// GET|POST  /contacts/create         -> create_form | create
/// GET       /contacts/{id}           -> detail
/// GET|POST  /contacts/{id}/update    -> update_form | update
/// GET|POST  /contacts/{id}/delete    -> delete_prompt | delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::index))
        .route("/contacts", get(contact::index))
        .route("/contacts/search", get(contact::search))
        .route(
            "/contacts/create",
            get(contact::create_form).post(contact::create),
        )
        .route("/contacts/{id}", get(contact::detail))
        .route(
            "/contacts/{id}/update",
            get(contact::update_form).post(contact::update),
        )
        .route(
            "/contacts/{id}/delete",
            get(contact::delete_prompt).post(contact::delete),
        )
}
