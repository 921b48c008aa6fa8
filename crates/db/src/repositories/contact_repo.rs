//! Repository for the `contacts` table.
//!
//! Every read used by the public pages filters on `show = true`. Writes that
//! act on an existing contact are additionally scoped to its owner, so a
//! hidden contact or somebody else's contact simply comes back as `None`.

use agenda_core::search::contains_pattern;
use agenda_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

/// Column list for contact queries, qualified for the category join.
const COLUMNS: &str = "c.id, c.first_name, c.last_name, c.phone, c.email, c.created_date, \
                       c.description, c.show, c.picture, c.category_id, \
                       cat.name AS category_name, c.owner_id";

const CATEGORY_JOIN: &str = "LEFT JOIN categories cat ON cat.id = c.category_id";

/// `$1` is the escaped `ILIKE` pattern.
const SEARCH_FILTER: &str = "c.show = true AND (\
                             c.first_name ILIKE $1 \
                             OR c.last_name ILIKE $1 \
                             OR c.phone ILIKE $1 \
                             OR c.email ILIKE $1)";

/// Provides the contact read and write paths.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a contact owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateContact,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO contacts
                    (first_name, last_name, phone, email, description, category_id, picture, owner_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c {CATEGORY_JOIN}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(&input.picture)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a contact regardless of visibility or owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts c {CATEGORY_JOIN} WHERE c.id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a visible contact.
    pub async fn find_visible(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts c {CATEGORY_JOIN} \
             WHERE c.id = $1 AND c.show = true"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a contact that is visible and owned by `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts c {CATEGORY_JOIN} \
             WHERE c.id = $1 AND c.owner_id = $2 AND c.show = true"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_visible(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts WHERE show = true")
            .fetch_one(pool)
            .await
    }

    /// One page of visible contacts, newest id first.
    pub async fn list_visible(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts c {CATEGORY_JOIN} \
             WHERE c.show = true \
             ORDER BY c.id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of visible contacts matching `term`. `term` is matched
    /// literally, case-insensitively.
    pub async fn count_search(pool: &PgPool, term: &str) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM contacts c WHERE {SEARCH_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(contains_pattern(term))
            .fetch_one(pool)
            .await
    }

    /// One page of visible contacts matching `term`, newest id first.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts c {CATEGORY_JOIN} \
             WHERE {SEARCH_FILTER} \
             ORDER BY c.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a visible contact owned by `owner_id`.
    ///
    /// A `None` picture keeps the stored one. Returns `None` when the contact
    /// is missing, hidden or owned by someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE contacts SET
                    first_name = $3,
                    last_name = $4,
                    phone = $5,
                    email = $6,
                    description = $7,
                    category_id = $8,
                    picture = COALESCE($9, picture)
                WHERE id = $1 AND owner_id = $2 AND show = true
                RETURNING *
             )
             SELECT {COLUMNS} FROM c {CATEGORY_JOIN}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(&input.picture)
            .fetch_optional(pool)
            .await
    }

    /// Delete a visible contact owned by `owner_id`. Returns `true` if a row
    /// was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM contacts WHERE id = $1 AND owner_id = $2 AND show = true")
                .bind(id)
                .bind(owner_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the `show` flag. Returns `true` if the row was visible before.
    pub async fn hide(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE contacts SET show = false WHERE id = $1 AND show = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
