//! Credentials and tokens: Argon2id password hashes in [`password`], access
//! and refresh tokens in [`jwt`]. The request extractor that uses them is
//! `crate::middleware::auth::AuthUser`.

pub mod jwt;
pub mod password;
