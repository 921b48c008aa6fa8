//! Login sessions. One row per successful login or refresh; logout and
//! refresh set `is_revoked`.

use agenda_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex digest of the refresh token issued with this session.
    pub refresh_token_hash: String,
    /// After this instant neither the refresh token nor access tokens
    /// naming the session are accepted.
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
