//! Render rows

use super::PageToken;
use super::ResourceItem;

/// One entry of the derived render list.
///
/// Placeholders only ever exist in derived output; they stand in for a page
/// that sits on the loading frontier.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// A concrete resource row.
    Item(ResourceItem),
    /// Stand-in for the rows of a pending page.
    Placeholder(PageToken),
}

impl Row {
    /// Returns `true` if this row is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Returns the resource item, if this is a concrete row.
    pub fn item(&self) -> Option<&ResourceItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Placeholder(_) => None,
        }
    }

    /// Returns the resource id, if this is a concrete row.
    pub fn resource_id(&self) -> Option<&str> {
        self.item().map(|item| item.id.as_str())
    }

    /// Returns the page token a placeholder stands in for.
    pub fn placeholder_token(&self) -> Option<&PageToken> {
        match self {
            Self::Placeholder(token) => Some(token),
            Self::Item(_) => None,
        }
    }
}

impl From<ResourceItem> for Row {
    fn from(item: ResourceItem) -> Self {
        Self::Item(item)
    }
}
