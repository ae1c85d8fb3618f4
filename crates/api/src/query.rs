//! Query-string types shared by list endpoints.

use serde::Deserialize;

/// `GET /images?category=&limit=&offset=`
///
/// `category` stays a string so a blank value (`?category=`) means "all"
/// rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ImageListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?search=` for the admin listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    /// The trimmed term, or `None` when blank.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
