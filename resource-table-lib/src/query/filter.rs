//! Validation of user-edited column input.

use regex::Regex;

use crate::error::ValidationError;

/// Checks that a column path is not empty.
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    Ok(())
}

/// Checks that a column filter compiles as a regular expression.
///
/// # Example
///
/// ```
/// use resource_table_lib::query::validate_filter;
///
/// assert!(validate_filter("name", "^Ad(a|am)$").is_ok());
/// assert!(validate_filter("name", "(unclosed").is_err());
/// ```
pub fn validate_filter(path: &str, expression: &str) -> Result<(), ValidationError> {
    Regex::new(expression)
        .map(|_| ())
        .map_err(|e| ValidationError::invalid_filter(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_expressions() {
        for expr in ["", "abc", "^[a-z]+$", r"\d{3}-\d{4}", "a|b"] {
            assert!(validate_filter("p", expr).is_ok(), "{expr}");
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(validate_path(""), Err(ValidationError::EmptyPath));
        assert!(validate_path("name").is_ok());
    }

    #[test]
    fn test_invalid_expressions() {
        for expr in ["(", "[a-", "*a", r"\"] {
            let err = validate_filter("p", expr).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFilter { ref path, .. } if path == "p"));
        }
    }
}
