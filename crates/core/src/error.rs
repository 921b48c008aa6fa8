use crate::types::DbId;

/// Domain failures the HTTP layer maps to status codes. Field-level form
/// problems are not errors here; they travel as `FieldErrors`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Also used when the row exists but the caller may not see or change it.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
