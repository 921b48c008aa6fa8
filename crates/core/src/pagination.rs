//! Page-number pagination for the public contact listing.
//!
//! Page numbers are 1-based and come straight from the `?page=` query string,
//! so parsing is lenient: anything that is not an integer selects the first
//! page, `last` selects the final one, and integers outside `1..=num_pages`
//! (however many digits) are clamped to the nearest valid page. An empty
//! result set still has one (empty) page.

use serde::Serialize;

/// Number of contacts shown per listing page.
pub const CONTACTS_PER_PAGE: i64 = 10;

/// Splits `count` items into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

/// A resolved page: its number plus the `LIMIT`/`OFFSET` window to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    #[serde(skip)]
    pub limit: i64,
    #[serde(skip)]
    pub offset: i64,
}

impl Paginator {
    /// `per_page` below 1 is treated as 1.
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Total number of pages, never less than 1.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a raw `page` query value to a valid page.
    pub fn page(&self, raw: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages();
        let number = raw
            .map_or(1, |s| parse_page(s.trim(), num_pages))
            .clamp(1, num_pages);

        PageWindow {
            number,
            num_pages,
            count: self.count,
            limit: self.per_page,
            offset: (number - 1) * self.per_page,
        }
    }
}

/// Integers too large for `i64` still say which end of the range they are on.
fn parse_page(raw: &str, num_pages: i64) -> i64 {
    if raw == "last" {
        return num_pages;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return n;
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if negative {
            1
        } else {
            num_pages
        }
    } else {
        1
    }
}

impl PageWindow {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then(|| self.number + 1)
    }
}
