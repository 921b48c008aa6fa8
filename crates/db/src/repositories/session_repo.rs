//! Repository for the `user_sessions` table.

use agenda_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                       created_at, updated_at";

/// A session still accepts its tokens.
const ACTIVE: &str = "is_revoked = false AND expires_at > NOW()";

/// Login sessions backing access and refresh tokens.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Whether session `id` belongs to `user_id` and is neither revoked nor
    /// expired.
    pub async fn is_active(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(
                SELECT 1 FROM user_sessions WHERE id = $1 AND user_id = $2 AND {ACTIVE}
             )"
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Active session issued with the refresh token whose digest is `hash`.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1 AND {ACTIVE}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a session. `false` when it was already revoked, so of two
    /// concurrent refreshes only one wins.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true, updated_at = NOW()
             WHERE id = $1 AND is_revoked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's sessions that are still usable.
    pub async fn count_active_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND {ACTIVE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
