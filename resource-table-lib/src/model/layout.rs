//! Column layout and path arithmetic.
//!
//! A [`ColumnLayout`] holds every known column plus the two visible path
//! lists. All mutations end in [`ColumnLayout::sync`], which restores the
//! invariants:
//!
//! - every listed path names exactly one column, and appears in one list
//! - a column is listed iff it is included
//! - `sort_index` is set iff the path is primary, and equals its position
//! - `order` is cleared whenever `sort_index` is

use std::collections::HashSet;

use crate::error::TableError;

use super::Column;
use super::Order;

/// Which visible path list a path lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathList {
    /// Sort keys, in priority order.
    Primary,
    /// Visible paths that are not sort keys.
    Secondary,
}

/// Moves one path within a list, or transfers it between lists.
///
/// `to_index` is clamped to the destination's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMove {
    /// List the path is taken from.
    pub from: PathList,
    /// Index of the path in `from`.
    pub from_index: usize,
    /// List the path is inserted into.
    pub to: PathList,
    /// Insertion index in `to`.
    pub to_index: usize,
}

impl PathMove {
    /// Reorders within one list.
    pub fn within(list: PathList, from_index: usize, to_index: usize) -> Self {
        Self {
            from: list,
            from_index,
            to: list,
            to_index,
        }
    }

    /// Transfers between lists.
    pub fn transfer(from: PathList, from_index: usize, to: PathList, to_index: usize) -> Self {
        Self {
            from,
            from_index,
            to,
            to_index,
        }
    }
}

/// Columns together with the primary and secondary path lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    columns: Vec<Column>,
    primary_paths: Vec<String>,
    secondary_paths: Vec<String>,
}

impl ColumnLayout {
    /// Builds a layout from server-provided parts.
    ///
    /// Fails if a column path is duplicated or a listed path has no column.
    /// Sort indices are then recomputed from `primary_paths`.
    pub fn new(
        columns: Vec<Column>,
        primary_paths: Vec<String>,
        secondary_paths: Vec<String>,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.path.as_str()) {
                return Err(TableError::MalformedHeader(format!(
                    "duplicate column {}",
                    column.path
                )));
            }
        }

        let mut listed = HashSet::new();
        for path in primary_paths.iter().chain(&secondary_paths) {
            if !seen.contains(path.as_str()) {
                return Err(TableError::MalformedHeader(format!(
                    "path {path} has no column"
                )));
            }
            if !listed.insert(path.as_str()) {
                return Err(TableError::MalformedHeader(format!(
                    "path {path} is listed twice"
                )));
            }
        }

        let mut layout = Self {
            columns,
            primary_paths,
            secondary_paths,
        };
        for path in layout.primary_paths.iter().chain(&layout.secondary_paths) {
            if let Some(column) = layout.columns.iter_mut().find(|c| &c.path == path) {
                column.include = true;
            }
        }
        layout.sync();
        Ok(layout)
    }

    /// Returns every known column in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column for `path`.
    pub fn column(&self, path: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.path == path)
    }

    /// Returns the sort keys in priority order.
    pub fn primary_paths(&self) -> &[String] {
        &self.primary_paths
    }

    /// Returns the visible non-sort paths.
    pub fn secondary_paths(&self) -> &[String] {
        &self.secondary_paths
    }

    /// Returns every visible path, primary first.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.primary_paths
            .iter()
            .chain(&self.secondary_paths)
            .map(String::as_str)
    }

    /// Returns the visible columns in rendering order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.paths().filter_map(|path| self.column(path)).collect()
    }

    /// Applies a move-or-transfer to the path lists.
    pub fn move_path(&mut self, mv: PathMove) -> Result<(), TableError> {
        let source = self.list_mut(mv.from);
        if mv.from_index >= source.len() {
            return Err(TableError::IndexOutOfRange {
                index: mv.from_index,
                len: source.len(),
            });
        }
        let path = source.remove(mv.from_index);

        let target = self.list_mut(mv.to);
        let index = mv.to_index.min(target.len());
        target.insert(index, path);

        self.sync();
        Ok(())
    }

    /// Cycles a path through: not sorted, ascending, descending, removed.
    ///
    /// A path leaving the sort keys stays visible as the first secondary path.
    pub fn toggle_path(&mut self, path: &str) -> Result<(), TableError> {
        let column = self
            .column_mut(path)
            .ok_or_else(|| TableError::UnknownPath(path.to_string()))?;
        let order = column.order;

        match self.primary_paths.iter().position(|p| p == path) {
            None => {
                self.secondary_paths.retain(|p| p != path);
                self.primary_paths.push(path.to_string());
                if let Some(column) = self.column_mut(path) {
                    column.include = true;
                    column.order = Some(Order::Asc);
                }
            }
            Some(index) if order == Some(Order::Desc) => {
                self.primary_paths.remove(index);
                self.secondary_paths.insert(0, path.to_string());
            }
            Some(_) => {
                if let Some(column) = self.column_mut(path) {
                    column.order = Some(Order::Desc);
                }
            }
        }

        self.sync();
        Ok(())
    }

    /// Replaces include flags and filters from an edited copy of the columns.
    ///
    /// Columns missing from `edited` keep their current state.
    pub fn update_columns(&mut self, edited: &[Column]) -> Result<(), TableError> {
        for edit in edited {
            let column = self
                .column_mut(&edit.path)
                .ok_or_else(|| TableError::UnknownPath(edit.path.clone()))?;
            column.include = edit.include;
            column.filter = edit.filter.clone();
        }
        self.sync();
        Ok(())
    }

    /// Sets or clears one column's filter.
    pub fn set_filter(&mut self, path: &str, filter: Option<String>) -> Result<(), TableError> {
        let column = self
            .column_mut(path)
            .ok_or_else(|| TableError::UnknownPath(path.to_string()))?;
        column.filter = filter.filter(|f| !f.is_empty());
        Ok(())
    }

    /// Restores the layout invariants after a mutation.
    pub fn sync(&mut self) {
        let included: HashSet<String> = self
            .columns
            .iter()
            .filter(|c| c.include)
            .map(|c| c.path.clone())
            .collect();

        self.primary_paths.retain(|p| included.contains(p));
        self.secondary_paths.retain(|p| included.contains(p));

        let listed: HashSet<String> = self
            .primary_paths
            .iter()
            .chain(&self.secondary_paths)
            .cloned()
            .collect();
        for column in &self.columns {
            if column.include && !listed.contains(&column.path) {
                self.secondary_paths.push(column.path.clone());
            }
        }

        for column in &mut self.columns {
            match self.primary_paths.iter().position(|p| *p == column.path) {
                Some(index) => {
                    column.sort_index = Some(index);
                    column.order.get_or_insert(Order::Asc);
                }
                None => {
                    column.sort_index = None;
                    column.order = None;
                }
            }
        }
    }

    fn list_mut(&mut self, list: PathList) -> &mut Vec<String> {
        match list {
            PathList::Primary => &mut self.primary_paths,
            PathList::Secondary => &mut self.secondary_paths,
        }
    }

    fn column_mut(&mut self, path: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.path == path)
    }
}
