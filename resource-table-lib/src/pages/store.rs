//! Ordered store of row pages linked by token.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::error::TableError;
use crate::model::PageToken;
use crate::model::ResourceItem;
use crate::model::Row;
use crate::model::RowsPage;

use super::shows_placeholder;

/// The page chain of one table snapshot.
///
/// Pages are kept in the order the server sent them, but every traversal
/// follows the `previous`/`next` links instead of array position.
///
/// # Example
///
/// ```
/// use resource_table_lib::model::{PageToken, ResourceItem, Row, RowsPage};
/// use resource_table_lib::pages::PageStore;
///
/// let b = PageToken::new("b");
/// let mut store = PageStore::new(vec![
///     RowsPage::resolved("a", None, Some(b.clone()), vec![ResourceItem::new("1")]),
///     RowsPage::pending("b", Some(PageToken::new("a")), None),
/// ])
/// .unwrap();
///
/// assert_eq!(store.derive().last(), Some(&Row::Placeholder(b.clone())));
///
/// store.resolve(&b, vec![ResourceItem::new("2")]).unwrap();
/// assert!(store.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageStore {
    pages: Vec<RowsPage>,
    index: HashMap<PageToken, usize>,
}

impl PageStore {
    /// Creates a store from the server's page list.
    ///
    /// Fails if a token appears twice.
    pub fn new(pages: Vec<RowsPage>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(pages.len());
        for (position, page) in pages.iter().enumerate() {
            if index.insert(page.token().clone(), position).is_some() {
                return Err(TableError::MalformedHeader(format!(
                    "duplicate page token {}",
                    page.token()
                )));
            }
        }
        Ok(Self { pages, index })
    }

    /// Looks up a page by token.
    pub fn get(&self, token: &PageToken) -> Option<&RowsPage> {
        self.index.get(token).map(|&i| &self.pages[i])
    }

    /// Returns `true` if the token belongs to this store.
    pub fn contains(&self, token: &PageToken) -> bool {
        self.index.contains_key(token)
    }

    /// Returns the number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if the store holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Returns the number of pages still pending.
    pub fn pending_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_pending()).count()
    }

    /// Returns `true` once every page is resolved.
    pub fn is_complete(&self) -> bool {
        self.pages.iter().all(|p| !p.is_pending())
    }

    /// Transitions a pending page to resolved.
    ///
    /// A second resolve of the same token is a defect and fails with
    /// [`TableError::AlreadyResolved`].
    pub fn resolve(&mut self, token: &PageToken, items: Vec<ResourceItem>) -> Result<(), TableError> {
        let position = *self
            .index
            .get(token)
            .ok_or_else(|| TableError::UnknownPage(token.clone()))?;
        let page = &mut self.pages[position];
        if !page.is_pending() {
            return Err(TableError::AlreadyResolved(token.clone()));
        }
        page.fill(items);
        Ok(())
    }

    /// Returns the pages in chain order.
    ///
    /// Starts from the first page without a known predecessor and follows
    /// `next` links. Pages unreachable from there (a broken chain) follow in
    /// server order, each run again walked by link.
    pub fn chain(&self) -> Vec<&RowsPage> {
        let mut ordered = Vec::with_capacity(self.pages.len());
        let mut visited = HashSet::with_capacity(self.pages.len());

        let heads = self
            .pages
            .iter()
            .filter(|p| p.previous().is_none_or(|prev| !self.contains(prev)));
        let rest = self.pages.iter();

        for start in heads.chain(rest) {
            let mut current = Some(start);
            while let Some(page) = current {
                if !visited.insert(page.token()) {
                    break;
                }
                ordered.push(page);
                current = page.next().and_then(|next| self.get(next));
            }
        }
        ordered
    }

    /// Flattens the chain into the render list.
    ///
    /// Resolved pages contribute their rows. A pending page contributes one
    /// placeholder when [`shows_placeholder`] holds, and nothing otherwise.
    pub fn derive(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for page in self.chain() {
            if !page.is_pending() {
                rows.extend(page.items().iter().cloned().map(Row::Item));
            } else if shows_placeholder(page, self) {
                rows.push(Row::Placeholder(page.token().clone()));
            }
        }
        rows
    }

    /// Returns the pending pages that currently render as placeholders.
    pub fn frontier(&self) -> Vec<PageToken> {
        self.chain()
            .into_iter()
            .filter(|page| shows_placeholder(page, self))
            .map(|page| page.token().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(t: &str) -> PageToken {
        PageToken::new(t)
    }

    fn items(prefix: &str, n: usize) -> Vec<ResourceItem> {
        (0..n).map(|i| ResourceItem::new(format!("{prefix}{i}"))).collect()
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                Row::Item(item) => item.id.clone(),
                Row::Placeholder(t) => format!("<{t}>"),
            })
            .collect()
    }

    /// `a -> b -> c` with only `a` resolved.
    fn three_pages() -> PageStore {
        PageStore::new(vec![
            RowsPage::resolved("a", None, Some(token("b")), items("a", 2)),
            RowsPage::pending("b", Some(token("a")), Some(token("c"))),
            RowsPage::pending("c", Some(token("b")), None),
        ])
        .unwrap()
    }

    #[test]
    fn test_derive_three_pages() {
        let mut store = three_pages();
        assert_eq!(ids(&store.derive()), ["a0", "a1", "<b>"]);

        store.resolve(&token("b"), items("b", 1)).unwrap();
        assert_eq!(ids(&store.derive()), ["a0", "a1", "b0", "<c>"]);

        store.resolve(&token("c"), items("c", 1)).unwrap();
        assert_eq!(ids(&store.derive()), ["a0", "a1", "b0", "c0"]);
        assert!(store.is_complete());
    }

    #[test]
    fn test_resolve_twice_fails() {
        let mut store = three_pages();
        store.resolve(&token("b"), vec![]).unwrap();
        assert_eq!(
            store.resolve(&token("b"), vec![]),
            Err(TableError::AlreadyResolved(token("b")))
        );
        assert_eq!(
            store.resolve(&token("a"), vec![]),
            Err(TableError::AlreadyResolved(token("a")))
        );
    }

    #[test]
    fn test_resolve_unknown_token() {
        let mut store = three_pages();
        assert_eq!(
            store.resolve(&token("zz"), vec![]),
            Err(TableError::UnknownPage(token("zz")))
        );
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let result = PageStore::new(vec![
            RowsPage::pending("a", None, None),
            RowsPage::pending("a", None, None),
        ]);
        assert!(matches!(result, Err(TableError::MalformedHeader(_))));
    }

    #[test]
    fn test_chain_order_ignores_array_order() {
        let store = PageStore::new(vec![
            RowsPage::resolved("c", Some(token("b")), None, items("c", 1)),
            RowsPage::resolved("a", None, Some(token("b")), items("a", 1)),
            RowsPage::resolved("b", Some(token("a")), Some(token("c")), items("b", 1)),
        ])
        .unwrap();
        assert_eq!(ids(&store.derive()), ["a0", "b0", "c0"]);
    }

    #[test]
    fn test_resolution_order_does_not_matter() {
        let tokens = ["b", "c", "d", "e"];
        let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];

        let build = || {
            PageStore::new(vec![
                RowsPage::resolved("a", None, Some(token("b")), items("a", 1)),
                RowsPage::pending("b", Some(token("a")), Some(token("c"))),
                RowsPage::pending("c", Some(token("b")), Some(token("d"))),
                RowsPage::pending("d", Some(token("c")), Some(token("e"))),
                RowsPage::pending("e", Some(token("d")), None),
            ])
            .unwrap()
        };

        let mut results = Vec::new();
        for order in orders {
            let mut store = build();
            for i in order {
                store.resolve(&token(tokens[i]), items(tokens[i], 2)).unwrap();
                let _ = store.derive();
            }
            results.push(ids(&store.derive()));
        }
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0].len(), 9);
    }

    #[test]
    fn test_no_placeholder_inside_pending_run() {
        let store = PageStore::new(vec![
            RowsPage::resolved("a", None, Some(token("b")), items("a", 1)),
            RowsPage::pending("b", Some(token("a")), Some(token("c"))),
            RowsPage::pending("c", Some(token("b")), Some(token("d"))),
            RowsPage::pending("d", Some(token("c")), Some(token("e"))),
            RowsPage::resolved("e", Some(token("d")), None, items("e", 1)),
        ])
        .unwrap();
        assert_eq!(ids(&store.derive()), ["a0", "<b>", "<d>", "e0"]);
        assert_eq!(store.frontier(), [token("b"), token("d")]);
    }

    #[test]
    fn test_frontier_shrinks_to_empty() {
        let mut store = three_pages();
        let mut rounds = 0;
        while let Some(next) = store.frontier().first().cloned() {
            store.resolve(&next, items(next.as_str(), 1)).unwrap();
            rounds += 1;
        }
        assert_eq!(rounds, 2);
        assert!(store.is_complete());
    }
}
