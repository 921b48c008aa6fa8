/// Primary keys are PostgreSQL `BIGSERIAL`.
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
