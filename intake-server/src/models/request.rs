//! Request (zayavka) models
//!
//! `NewRequest` and `Status` carry validated caller input; `Request` is the
//! read-side wire shape with `created_at` already rendered as RFC 3339.

use std::collections::BTreeMap;

use serde::Serialize;

use super::validation::{bounded_text, ValidationError};

/// Column limits, in characters
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_MESSAGE_LEN: usize = 500;
pub const MAX_STATUS_LEN: usize = 20;
pub const MAX_QUERY_LEN: usize = 200;

/// Validated input for the create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    name: String,
    phone: String,
    message: String,
}

impl NewRequest {
    /// Validate a name/phone/message triple.
    ///
    /// # Rules
    /// - Each field is trimmed; blank fields are rejected
    /// - name ≤ 100, phone ≤ 20, message ≤ 500 characters
    ///
    /// # Example
    /// ```
    /// use intake_server::models::NewRequest;
    ///
    /// assert!(NewRequest::new("Ivan", "+1000000000", "Call me back").is_ok());
    /// assert!(NewRequest::new("", "+1000000000", "Call me back").is_err());
    /// ```
    pub fn new(name: &str, phone: &str, message: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: bounded_text("name", name, MAX_NAME_LEN)?,
            phone: bounded_text("phone", phone, MAX_PHONE_LEN)?,
            message: bounded_text("message", message, MAX_MESSAGE_LEN)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Free-form status label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status(String);

impl Status {
    /// Status assigned to every freshly created request
    pub const DEFAULT: &'static str = "new";

    /// Labels the operator front-end knows about. Not enforced.
    pub const WELL_KNOWN: [&'static str; 3] = ["new", "in_progress", "completed"];

    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("status", s, MAX_STATUS_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Status {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Free-text search term matched against name, phone and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("query", s, MAX_QUERY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Optional narrowing for list queries. The default lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub query: Option<SearchQuery>,
}

impl ListFilter {
    /// Build a filter from raw parameters.
    ///
    /// Absent or blank values mean "no filter", as does the status `all`
    /// which the front-end sends for its unfiltered view.
    pub fn from_params(status: Option<&str>, query: Option<&str>) -> Result<Self, ValidationError> {
        let status = match status.map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(Status::new(s)?),
        };
        let query = match query.map(str::trim) {
            None | Some("") => None,
            Some(q) => Some(SearchQuery::new(q)?),
        };
        Ok(Self { status, query })
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.query.is_none()
    }
}

/// A persisted request as it leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub message: String,
    /// RFC 3339 (ISO-8601) timestamp
    pub created_at: String,
    pub status: String,
}

/// Row counts per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    #[serde(flatten)]
    pub by_status: BTreeMap<String, i64>,
}

impl StatusCounts {
    /// Fold `(status, count)` rows, seeding the well-known statuses with zero.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut by_status: BTreeMap<String, i64> = Status::WELL_KNOWN
            .iter()
            .map(|s| ((*s).to_owned(), 0))
            .collect();
        let mut total = 0;
        for (status, count) in rows {
            total += count;
            *by_status.entry(status).or_insert(0) += count;
        }
        Self { total, by_status }
    }

    /// Count for a single status (zero when unseen).
    pub fn get(&self, status: &str) -> i64 {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}
