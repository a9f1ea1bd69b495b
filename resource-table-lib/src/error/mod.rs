//! Error types

mod address;
mod channel;
mod fetch;
mod table;
mod validation;

pub use address::*;
pub use channel::*;
pub use fetch::*;
pub use table::*;
pub use validation::*;

/// Top-level error for table operations.
///
/// Every variant is `Clone` so one in-flight result can be handed to every
/// caller waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A header, page, or patch request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An internal table invariant was violated.
    #[error(transparent)]
    Table(#[from] TableError),

    /// User input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The address store rejected a read or write.
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl Error {
    /// Returns `true` if this error indicates a defect rather than a
    /// condition the user can act on.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::Table(TableError::AlreadyResolved(_) | TableError::InvalidRow(_))
        )
    }
}
