//! Table invariant errors

use crate::model::PageToken;

/// Violations of the table aggregate's internal invariants.
///
/// `AlreadyResolved` and `InvalidRow` indicate defects in the caller and are
/// never produced by well-formed server input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A page was resolved twice.
    #[error("page {0} is already resolved")]
    AlreadyResolved(PageToken),

    /// The page token is not part of the snapshot.
    #[error("unknown page token: {0}")]
    UnknownPage(PageToken),

    /// A placeholder row was used where a resource row was required.
    #[error("placeholder row for page {0} is not a resource row")]
    InvalidRow(PageToken),

    /// No table snapshot is loaded.
    #[error("no table snapshot is loaded")]
    NoSnapshot,

    /// A path is not a known column.
    #[error("unknown column path: {0}")]
    UnknownPath(String),

    /// A move referenced an index outside its path list.
    #[error("index {index} out of range for a list of {len} paths")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the list it was applied to.
        len: usize,
    },

    /// The server header broke the column/path invariants.
    #[error("malformed table header: {0}")]
    MalformedHeader(String),
}
