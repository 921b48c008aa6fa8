//! Request extractors shared by the protected handlers.
//!
//! - [`auth::AuthUser`] -- the authenticated user, from a Bearer access token.

pub mod auth;
