//! Contact search helpers.
//!
//! Search is a case-insensitive substring match over first name, last name,
//! phone and email. The user's text is matched literally: SQL `LIKE`
//! wildcards in the query are escaped before it reaches the database.

/// Trim a raw `?q=` value and drop NUL characters. Returns `None` when
/// nothing is left to search for.
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    let cleaned = raw.unwrap_or("").replace('\0', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Escape `LIKE` metacharacters using the default `\` escape.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build an `ILIKE` pattern matching `term` anywhere in a column.
///
/// ```
/// use agenda_core::search::contains_pattern;
/// assert_eq!(contains_pattern("ann"), "%ann%");
/// assert_eq!(contains_pattern("50%"), "%50\\%%");
/// ```
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
