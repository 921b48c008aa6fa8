//! Shared query parameter types for the page handlers.

use serde::Deserialize;

/// `?page=` for paginated listings. Kept as raw text: malformed values fall
/// back to the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// `?q=&page=` for the contact search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// `?next=` remembered across the login redirect.
#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}
