//! Table identifier validation
//!
//! The request table name is configurable and ends up inside SQL text,
//! so it is restricted to a plain lowercase identifier.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Lowercase identifier, at most 48 bytes so `idx_<table>_created_at`
/// stays within the 63-byte Postgres identifier limit
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,47}$").expect("invalid identifier regex"));

/// Validated table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub const DEFAULT: &'static str = "requests";

    /// # Example
    /// ```
    /// use intake_server::models::TableName;
    ///
    /// assert!(TableName::new("requests").is_ok());
    /// assert!(TableName::new("requests; DROP TABLE x").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "table" });
        }

        if !IDENT_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "table",
                reason: "must be a lowercase identifier (a-z, 0-9, _) of at most 48 characters",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text, so reserved words such as `user`
    /// are still usable as table names.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Quoted name of the `created_at` index on this table.
    pub fn created_at_index(&self) -> String {
        format!("\"idx_{}_created_at\"", self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TableName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TableName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
