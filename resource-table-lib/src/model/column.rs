//! Column projection types

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Sort direction of a primary path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Order {
    /// Returns the wire form (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field projection of the table.
///
/// `sort_index` is defined iff the path is a primary path, and `order` is
/// only meaningful while `sort_index` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Property path, unique within a table.
    pub path: String,
    /// Whether the column is rendered.
    #[serde(default)]
    pub include: bool,
    /// Position among the primary (sort) paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<usize>,
    /// Sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Per-column filter expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Column {
    /// Creates a visible, unsorted, unfiltered column.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            include: true,
            sort_index: None,
            order: None,
            filter: None,
        }
    }

    /// Sets whether the column is rendered.
    pub fn included(mut self, include: bool) -> Self {
        self.include = include;
        self
    }

    /// Makes the column a sort key at `index`.
    pub fn sorted(mut self, index: usize, order: Order) -> Self {
        self.sort_index = Some(index);
        self.order = Some(order);
        self
    }

    /// Sets the column filter.
    pub fn filtered(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Returns `true` if this column is a sort key.
    pub fn is_sort_key(&self) -> bool {
        self.sort_index.is_some()
    }
}
