//! Validation error types

use std::fmt;

/// Validation error for caller-supplied request data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing, empty, or whitespace only
    Empty { field: &'static str },

    /// Field exceeds the column limit (in characters)
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., table identifier)
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } | Self::InvalidFormat { field, .. } => {
                field
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and check it is non-empty, NUL-free and at most `max` characters.
pub(crate) fn bounded_text(
    field: &'static str,
    raw: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.contains('\0') {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain NUL characters",
        });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "message",
            max: 500,
        };
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 500 characters"
        );
        assert_eq!(
            ValidationError::Empty { field: "name" }.to_string(),
            "name cannot be empty"
        );
    }

    #[test]
    fn bounded_text_trims_and_counts_chars() {
        assert_eq!(bounded_text("name", "  Ivan ", 100).unwrap(), "Ivan");

        // Cyrillic is two bytes per char in UTF-8; the limit is in chars
        let cyrillic = "я".repeat(20);
        assert!(bounded_text("phone", &cyrillic, 20).is_ok());

        let err = bounded_text("phone", &"я".repeat(21), 20).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { field: "phone", max: 20 });
    }

    #[test]
    fn bounded_text_rejects_blank() {
        assert_eq!(
            bounded_text("name", "   ", 100).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
        assert_eq!(bounded_text("name", "", 100).unwrap_err().field(), "name");
    }

    #[test]
    fn bounded_text_rejects_nul() {
        let err = bounded_text("message", "call\0me", 500).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "message", .. }));
        assert_eq!(err.to_string(), "message: must not contain NUL characters");
    }
}
