//! Decides which pending pages render as placeholders.

use crate::model::PageToken;
use crate::model::RowsPage;

use super::PageStore;

/// Returns `true` if a pending page should render as a placeholder now.
///
/// A page qualifies when it is the only page, or when at least one of its
/// neighbours exists and is resolved. Pending pages deeper in a pending run
/// are skipped until a neighbour resolves, so only the pages bordering loaded
/// data can prompt a fetch.
///
/// Resolved pages never render as placeholders.
pub fn shows_placeholder(page: &RowsPage, store: &PageStore) -> bool {
    if !page.is_pending() {
        return false;
    }
    if page.is_only_page() {
        return true;
    }
    let resolved = |token: &PageToken| store.get(token).is_some_and(|p| !p.is_pending());
    page.previous().is_some_and(resolved) || page.next().is_some_and(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceItem;

    fn token(t: &str) -> Option<PageToken> {
        Some(PageToken::new(t))
    }

    #[test]
    fn test_sole_page_always_shows() {
        let store = PageStore::new(vec![RowsPage::pending("a", None, None)]).unwrap();
        assert!(shows_placeholder(store.get(&"a".into()).unwrap(), &store));
    }

    #[test]
    fn test_resolved_neighbour_anchors_gap() {
        let store = PageStore::new(vec![
            RowsPage::pending("a", None, token("b")),
            RowsPage::resolved("b", token("a"), token("c"), vec![ResourceItem::new("1")]),
            RowsPage::pending("c", token("b"), None),
        ])
        .unwrap();
        assert!(shows_placeholder(store.get(&"a".into()).unwrap(), &store));
        assert!(shows_placeholder(store.get(&"c".into()).unwrap(), &store));
    }

    #[test]
    fn test_pending_run_defers() {
        let store = PageStore::new(vec![
            RowsPage::pending("a", None, token("b")),
            RowsPage::pending("b", token("a"), None),
        ])
        .unwrap();
        assert!(!shows_placeholder(store.get(&"a".into()).unwrap(), &store));
        assert!(!shows_placeholder(store.get(&"b".into()).unwrap(), &store));
    }

    #[test]
    fn test_missing_neighbour_is_not_an_anchor() {
        let store = PageStore::new(vec![RowsPage::pending("a", token("ghost"), None)]).unwrap();
        assert!(!shows_placeholder(store.get(&"a".into()).unwrap(), &store));
    }

    #[test]
    fn test_resolved_page_is_never_a_placeholder() {
        let store = PageStore::new(vec![RowsPage::resolved("a", None, None, vec![])]).unwrap();
        assert!(!shows_placeholder(store.get(&"a".into()).unwrap(), &store));
    }
}
