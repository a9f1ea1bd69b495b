//! In-memory address store.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::watch;

use super::AddressStore;
use crate::error::AddressError;
use crate::query::ParamPatch;
use crate::query::Params;

/// An address held in memory, observable through a watch channel.
///
/// Used by the CLI and in tests in place of a browser location.
///
/// # Example
///
/// ```
/// use resource_table_lib::address::InMemoryAddress;
///
/// let address = InMemoryAddress::from_query("?paths=name:0:asc&resourceId=7");
/// assert_eq!(address.current().get("resourceId"), Some("7"));
/// ```
#[derive(Debug)]
pub struct InMemoryAddress {
    params: watch::Sender<Params>,
    writes: AtomicUsize,
}

impl InMemoryAddress {
    /// Creates an empty address.
    pub fn new() -> Self {
        Self::with_params(Params::new())
    }

    /// Creates an address holding `params`.
    pub fn with_params(params: Params) -> Self {
        Self {
            params: watch::Sender::new(params),
            writes: AtomicUsize::new(0),
        }
    }

    /// Creates an address from a query string.
    pub fn from_query(query: &str) -> Self {
        Self::with_params(Params::from_query(query))
    }

    /// Returns a copy of the current parameters.
    pub fn current(&self) -> Params {
        self.params.borrow().clone()
    }

    /// Subscribes to parameter changes.
    pub fn subscribe(&self) -> watch::Receiver<Params> {
        self.params.subscribe()
    }

    /// Returns how many writes have been applied.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryAddress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressStore for InMemoryAddress {
    async fn read(&self) -> Result<Params, AddressError> {
        Ok(self.current())
    }

    async fn write(&self, patch: ParamPatch, merge: bool) -> Result<(), AddressError> {
        self.params.send_modify(|params| params.apply(patch, merge));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_merges_and_notifies() {
        let address = InMemoryAddress::from_query("a=1&b=2");
        let mut changes = address.subscribe();

        address
            .write(ParamPatch::new().set("b", "3").remove("a"), true)
            .await
            .unwrap();

        assert!(changes.has_changed().unwrap());
        let params = changes.borrow_and_update().clone();
        assert_eq!(params, Params::new().with("b", "3"));
        assert_eq!(address.write_count(), 1);
    }
}
