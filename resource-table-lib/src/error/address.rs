//! Address store error types

/// Errors reported by an [`AddressStore`](crate::address::AddressStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The navigation was refused (e.g. a guard cancelled it).
    #[error("navigation rejected: {0}")]
    Rejected(String),
}
