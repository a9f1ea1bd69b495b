//! Rows page types

use serde::Deserialize;
use serde::Serialize;

use super::ResourceItem;

/// Opaque identifier of one page of rows.
///
/// Stable for the lifetime of a table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Creates a page token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One slice of rows, fetched or still pending.
///
/// Pages link to their neighbours by token. A page with neither neighbour is
/// the only page of the table.
///
/// A page moves from pending to resolved exactly once, through
/// [`PageStore::resolve`](crate::pages::PageStore::resolve).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsPage {
    page_token: PageToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_page_token: Option<PageToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_page_token: Option<PageToken>,
    #[serde(default)]
    pending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<ResourceItem>>,
}

impl RowsPage {
    /// Creates a page whose rows have not been fetched yet.
    pub fn pending(
        token: impl Into<PageToken>,
        previous: Option<PageToken>,
        next: Option<PageToken>,
    ) -> Self {
        Self {
            page_token: token.into(),
            previous_page_token: previous,
            next_page_token: next,
            pending: true,
            items: None,
        }
    }

    /// Creates a page that already carries its rows.
    pub fn resolved(
        token: impl Into<PageToken>,
        previous: Option<PageToken>,
        next: Option<PageToken>,
        items: Vec<ResourceItem>,
    ) -> Self {
        Self {
            page_token: token.into(),
            previous_page_token: previous,
            next_page_token: next,
            pending: false,
            items: Some(items),
        }
    }

    /// Returns the page token.
    pub fn token(&self) -> &PageToken {
        &self.page_token
    }

    /// Returns the token of the preceding page, if any.
    pub fn previous(&self) -> Option<&PageToken> {
        self.previous_page_token.as_ref()
    }

    /// Returns the token of the following page, if any.
    pub fn next(&self) -> Option<&PageToken> {
        self.next_page_token.as_ref()
    }

    /// Returns `true` until rows have been fetched for this page.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns `true` if this page has no neighbours.
    pub fn is_only_page(&self) -> bool {
        self.previous_page_token.is_none() && self.next_page_token.is_none()
    }

    /// Returns the resolved rows, empty while pending.
    pub fn items(&self) -> &[ResourceItem] {
        self.items.as_deref().unwrap_or_default()
    }

    pub(crate) fn fill(&mut self, items: Vec<ResourceItem>) {
        self.pending = false;
        self.items = Some(items);
    }
}
