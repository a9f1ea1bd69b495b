//! Table API collaborators.
//!
//! [`TableApi`] is the seam between the controller and the server. The
//! [`HttpTableApi`] implementation talks JSON over HTTP; tests substitute an
//! in-memory fake.

mod http;

pub use http::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::PageToken;
use crate::model::ResourceItem;
use crate::model::ResourceName;
use crate::model::TableField;
use crate::model::TableHeader;
use crate::query::Params;

/// Server operations the table controller depends on.
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Fetches the table header (columns, path lists, page chain, hash) for
    /// the configuration encoded in `params`.
    async fn fetch_table(
        &self,
        resource: &ResourceName,
        params: &Params,
    ) -> Result<TableHeader, FetchError>;

    /// Fetches the rows of one page.
    async fn fetch_page(
        &self,
        resource: &ResourceName,
        token: &PageToken,
    ) -> Result<Vec<ResourceItem>, FetchError>;

    /// Applies a single-field edit and returns the updated resource.
    async fn patch_field(
        &self,
        resource: &ResourceName,
        field: &TableField,
    ) -> Result<ResourceItem, FetchError>;
}

#[async_trait]
impl<T: TableApi + ?Sized> TableApi for Arc<T> {
    async fn fetch_table(
        &self,
        resource: &ResourceName,
        params: &Params,
    ) -> Result<TableHeader, FetchError> {
        (**self).fetch_table(resource, params).await
    }

    async fn fetch_page(
        &self,
        resource: &ResourceName,
        token: &PageToken,
    ) -> Result<Vec<ResourceItem>, FetchError> {
        (**self).fetch_page(resource, token).await
    }

    async fn patch_field(
        &self,
        resource: &ResourceName,
        field: &TableField,
    ) -> Result<ResourceItem, FetchError> {
        (**self).patch_field(resource, field).await
    }
}
