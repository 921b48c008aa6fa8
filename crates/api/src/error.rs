use agenda_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::response::SeeOther;

/// Path of the login page unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/user/login";

/// Everything a handler can fail with. Domain and database errors become the
/// JSON envelope `{ "error", "code" }`; [`AppError::LoginRequired`] becomes a
/// redirect instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unreadable request body, e.g. malformed multipart.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full, reported to the client without detail.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// A protected page was requested without a usable session.
    #[error("Login required for {next}")]
    LoginRequired { next: String },
}

pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
            }
            AppError::Database(err) => classify_sqlx_error(&err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::LoginRequired { next } => {
                return SeeOther::to(login_url(&next)).into_response();
            }
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// `RowNotFound` is a 404 and a unique violation (SQLSTATE 23505) on a
/// `uq_*` constraint is a 409. Anything else is logged and hidden behind a
/// 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }
    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or_default();
        if db_err.code().as_deref() == Some("23505") && constraint.starts_with("uq_") {
            return (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            );
        }
    }
    tracing::error!(error = %err, "Database error");
    internal()
}

/// `/user/login?next=<path>` with `path` percent-encoded as a query value.
pub fn login_url(next: &str) -> String {
    let mut url = format!("{LOGIN_PATH}?next=");
    for byte in next.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}
