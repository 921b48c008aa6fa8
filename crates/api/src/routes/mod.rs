pub mod account;
pub mod contact;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                   contact list
/// /contacts                           contact list (?page=)
/// /contacts/search                    search (?q=&page=)
/// /contacts/create                    create form, create (auth)
/// /contacts/{id}                      detail
/// /contacts/{id}/update               update form, update (auth)
/// /contacts/{id}/delete               confirmation, delete (auth)
///
/// /user/register                      register form, register
/// /user/login                         login form, login
/// /user/logout                        logout (auth)
/// /user/refresh                       token refresh (JSON)
/// /user/update                        profile form, profile update (auth)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(contact::router())
        .nest("/user", account::router())
}
