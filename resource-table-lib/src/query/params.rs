//! Flat parameter maps and merge patches.

use std::collections::BTreeMap;

/// A flat string-keyed parameter map, as carried by the address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Later duplicates win.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// Serializes the map as a query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes `key`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Chained form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies a patch.
    ///
    /// With `merge`, patched keys overlay the current ones and untouched keys
    /// survive. Without it, the result holds only the patch's set keys.
    pub fn apply(&mut self, patch: ParamPatch, merge: bool) {
        if !merge {
            self.0.clear();
        }
        for (key, value) in patch.0 {
            match value {
                Some(value) => {
                    self.0.insert(key, value);
                }
                None => {
                    self.0.remove(&key);
                }
            }
        }
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A partial update of a [`Params`] map.
///
/// `None` values remove their key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamPatch(BTreeMap<String, Option<String>>);

impl ParamPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    /// Removes `key`.
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), None);
        self
    }

    /// Sets `key` when `value` is `Some`, removes it otherwise.
    pub fn set_or_remove(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }

    /// Returns the patched value for `key`: `Some(None)` means removal.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(Option::as_deref)
    }

    /// Returns `true` if the patch touches no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Params> for ParamPatch {
    fn from(params: Params) -> Self {
        Self(params.0.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_untouched_keys() {
        let mut params = Params::new().with("a", "1").with("b", "2");
        params.apply(ParamPatch::new().set("b", "3").set("c", "4"), true);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("3"));
        assert_eq!(params.get("c"), Some("4"));
    }

    #[test]
    fn test_merge_removes_none_keys() {
        let mut params = Params::new().with("a", "1").with("b", "2");
        params.apply(ParamPatch::new().remove("a"), true);
        assert_eq!(params.get("a"), None);
        assert_eq!(params.get("b"), Some("2"));
    }

    #[test]
    fn test_replace_drops_everything_else() {
        let mut params = Params::new().with("a", "1");
        params.apply(ParamPatch::new().set("b", "2"), false);
        assert_eq!(params, Params::new().with("b", "2"));
    }

    #[test]
    fn test_query_string() {
        let params = Params::new().with("paths", "name:0:asc,age").with("filter", "a b");
        let query = params.to_query();
        assert_eq!(query, "filter=a+b&paths=name%3A0%3Aasc%2Cage");
        assert_eq!(Params::from_query(&format!("?{query}")), params);
    }
}
