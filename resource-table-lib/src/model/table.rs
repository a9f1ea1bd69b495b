//! Table aggregate and the server's table header.

use serde::Deserialize;
use serde::Serialize;

use crate::error::TableError;
use crate::pages::PageStore;

use super::Column;
use super::ColumnLayout;
use super::ResourceName;
use super::Row;
use super::RowsPage;

/// Table description returned by the server for one configuration.
///
/// Carries the complete page-token chain, with only the first requested page
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHeader {
    /// Every known column.
    pub columns: Vec<Column>,
    /// Sort keys in priority order.
    #[serde(default)]
    pub primary_paths: Vec<String>,
    /// Visible non-sort paths.
    #[serde(default)]
    pub secondary_paths: Vec<String>,
    /// The full page chain.
    pub rows_pages: Vec<RowsPage>,
    /// Echo of the decoded request plus the content hash.
    pub params: TableParams,
}

/// Query echo attached to a [`TableHeader`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableParams {
    /// Resource kind the table was built for.
    pub resource_name: ResourceName,
    /// Content fingerprint of the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Selected resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Global filter string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Lifecycle of one table snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePhase {
    /// The header is being fetched.
    #[default]
    Initializing,
    /// The header is loaded and some pages are pending.
    Partial,
    /// Every page is resolved.
    Complete,
}

/// One snapshot of a browsed resource.
///
/// Built wholesale from a [`TableHeader`] and never patched column-wise:
/// layout changes produce a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    layout: ColumnLayout,
    pages: PageStore,
    params: TableParams,
}

impl Table {
    /// Builds a table from a server header, validating every invariant.
    pub fn from_header(header: TableHeader) -> Result<Self, TableError> {
        let layout = ColumnLayout::new(
            header.columns,
            header.primary_paths,
            header.secondary_paths,
        )?;
        let pages = PageStore::new(header.rows_pages)?;
        Ok(Self {
            layout,
            pages,
            params: header.params,
        })
    }

    /// Returns the column layout.
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Returns the page chain.
    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub(crate) fn pages_mut(&mut self) -> &mut PageStore {
        &mut self.pages
    }

    /// Returns the query echo of this snapshot.
    pub fn params(&self) -> &TableParams {
        &self.params
    }

    /// Returns the content hash of this snapshot.
    pub fn hash(&self) -> Option<&str> {
        self.params.hash.as_deref()
    }

    /// Returns the derived render list.
    pub fn rows(&self) -> Vec<Row> {
        self.pages.derive()
    }

    /// Returns `Partial` while any page is pending, `Complete` otherwise.
    pub fn phase(&self) -> TablePhase {
        if self.pages.is_complete() {
            TablePhase::Complete
        } else {
            TablePhase::Partial
        }
    }
}
