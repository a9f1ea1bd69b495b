//! Address store: the key-value store holding table configuration.
//!
//! In a browser this is the query string of the current URL. The table
//! controller treats it as the single source of truth for columns, sorting,
//! filters and selection.

mod memory;

pub use memory::InMemoryAddress;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AddressError;
use crate::query::ParamPatch;
use crate::query::Params;

/// Backend trait for the address.
///
/// Writes with `merge` overlay the patched keys and leave every other key
/// untouched, so unrelated writes in flight do not clobber each other.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Reads the current parameters.
    async fn read(&self) -> Result<Params, AddressError>;

    /// Applies a patch, resolving once the navigation has completed.
    async fn write(&self, patch: ParamPatch, merge: bool) -> Result<(), AddressError>;
}

#[async_trait]
impl<T: AddressStore + ?Sized> AddressStore for Arc<T> {
    async fn read(&self) -> Result<Params, AddressError> {
        (**self).read().await
    }

    async fn write(&self, patch: ParamPatch, merge: bool) -> Result<(), AddressError> {
        (**self).write(patch, merge).await
    }
}
