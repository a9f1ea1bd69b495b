//! Validation error types

/// User input rejected before it reaches the address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A column filter is not a valid regular expression.
    #[error("invalid filter for {path}: {message}")]
    InvalidFilter {
        /// The column the filter was meant for.
        path: String,
        /// Error reported by the regex compiler.
        message: String,
    },

    /// A column path was empty.
    #[error("column path must not be empty")]
    EmptyPath,
}

impl ValidationError {
    /// Creates a new invalid-filter error.
    pub fn invalid_filter(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            path: path.into(),
            message: message.into(),
        }
    }
}
