//! Encoding of table configuration to and from address parameters.
//!
//! Columns travel in one parameter as a comma-joined list of
//! `path:sortIndex:order:filter` tuples, one per included column, in
//! rendering order. Empty trailing fields are omitted and every field is
//! percent-encoded, so paths and filters may contain `:` or `,`.
//!
//! ```text
//! paths=name:0:desc,age:1,email:::%5Ea
//! ```

use std::borrow::Cow;

use crate::model::Column;
use crate::model::ColumnLayout;
use crate::model::Order;

use super::Params;

/// Parameter holding the column tuples.
pub const PATHS: &str = "paths";
/// Parameter holding the selected resource id.
pub const RESOURCE_ID: &str = "resourceId";
/// Parameter holding the global filter string.
pub const FILTER: &str = "filter";
/// Parameter holding the cache-busting snapshot token.
pub const SNAPSHOT_ID: &str = "snapshotId";
/// Parameter holding the content hash of the current snapshot.
pub const HASH: &str = "hash";

/// One encoded column tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column path.
    pub path: String,
    /// Position among the sort keys.
    pub sort_index: Option<usize>,
    /// Sort direction, only present with `sort_index`.
    pub order: Option<Order>,
    /// Column filter, never empty.
    pub filter: Option<String>,
}

impl ColumnSpec {
    /// Creates an unsorted, unfiltered spec.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sort_index: None,
            order: None,
            filter: None,
        }
    }

    /// Makes the spec a sort key.
    pub fn sorted(mut self, index: usize, order: Order) -> Self {
        self.sort_index = Some(index);
        self.order = Some(order);
        self
    }

    /// Sets the filter.
    pub fn filtered(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl From<&Column> for ColumnSpec {
    fn from(column: &Column) -> Self {
        Self {
            path: column.path.clone(),
            sort_index: column.sort_index,
            order: column.sort_index.and(column.order),
            filter: column.filter.clone().filter(|f| !f.is_empty()),
        }
    }
}

/// Table configuration decoded from the address.
///
/// Every field is optional; a missing key means "server default".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableConfig {
    /// Included columns in rendering order.
    pub columns: Option<Vec<ColumnSpec>>,
    /// Selected resource id.
    pub resource_id: Option<String>,
    /// Global filter string.
    pub filter: Option<String>,
    /// Cache-busting token forcing a refetch.
    pub snapshot_id: Option<i64>,
    /// Content hash of the snapshot last shown.
    pub hash: Option<String>,
}

impl TableConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column specs.
    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Sets the selected resource id.
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Sets the global filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Returns the included columns of a layout in rendering order.
pub fn column_specs(layout: &ColumnLayout) -> Vec<ColumnSpec> {
    layout
        .visible_columns()
        .into_iter()
        .map(ColumnSpec::from)
        .collect()
}

/// Encodes one column tuple.
pub fn encode_column(spec: &ColumnSpec) -> String {
    let mut fields = vec![
        urlencoding::encode(&spec.path).into_owned(),
        spec.sort_index.map(|i| i.to_string()).unwrap_or_default(),
        spec.sort_index
            .and(spec.order)
            .map(|o| o.as_str().to_string())
            .unwrap_or_default(),
        spec.filter
            .as_deref()
            .map(|f| urlencoding::encode(f).into_owned())
            .unwrap_or_default(),
    ];
    while fields.len() > 1 && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    fields.join(":")
}

/// Encodes a column list.
pub fn encode_columns(specs: &[ColumnSpec]) -> String {
    specs.iter().map(encode_column).collect::<Vec<_>>().join(",")
}

/// Decodes one column tuple, or `None` if it is malformed.
pub fn decode_column(tuple: &str) -> Option<ColumnSpec> {
    let fields: Vec<&str> = tuple.split(':').collect();
    if fields.len() > 4 {
        return None;
    }
    let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());

    let path = unescape(field(0)?)?;
    if path.is_empty() {
        return None;
    }
    let sort_index = match field(1) {
        Some(raw) => Some(raw.parse::<usize>().ok()?),
        None => None,
    };
    let order = match field(2) {
        Some(raw) => Some(raw.parse::<Order>().ok()?),
        None => None,
    };
    if order.is_some() && sort_index.is_none() {
        return None;
    }
    let filter = match field(3) {
        Some(raw) => Some(unescape(raw)?.into_owned()),
        None => None,
    };

    Some(ColumnSpec {
        path: path.into_owned(),
        sort_index,
        order,
        filter,
    })
}

/// Decodes a column list, dropping malformed or repeated tuples.
pub fn decode_columns(raw: &str) -> Vec<ColumnSpec> {
    let mut specs: Vec<ColumnSpec> = Vec::new();
    for tuple in raw.split(',') {
        match decode_column(tuple) {
            Some(spec) if !specs.iter().any(|s| s.path == spec.path) => specs.push(spec),
            Some(spec) => log::debug!("dropping repeated column tuple for {}", spec.path),
            None if tuple.is_empty() => {}
            None => log::debug!("dropping malformed column tuple {tuple:?}"),
        }
    }
    specs
}

/// Encodes a configuration into address parameters.
pub fn encode(config: &TableConfig) -> Params {
    let mut params = Params::new();
    if let Some(columns) = &config.columns {
        params.insert(PATHS, encode_columns(columns));
    }
    if let Some(id) = &config.resource_id {
        params.insert(RESOURCE_ID, id.clone());
    }
    if let Some(filter) = &config.filter {
        params.insert(FILTER, filter.clone());
    }
    if let Some(snapshot) = config.snapshot_id {
        params.insert(SNAPSHOT_ID, snapshot.to_string());
    }
    if let Some(hash) = &config.hash {
        params.insert(HASH, hash.clone());
    }
    params
}

/// Decodes address parameters into a configuration.
///
/// Total: unknown keys are ignored and malformed values fall back to their
/// defaults.
pub fn decode(params: &Params) -> TableConfig {
    let non_empty = |key: &str| params.get(key).filter(|v| !v.is_empty()).map(str::to_string);

    TableConfig {
        columns: params.get(PATHS).map(decode_columns),
        resource_id: non_empty(RESOURCE_ID),
        filter: non_empty(FILTER),
        snapshot_id: params.get(SNAPSHOT_ID).and_then(|v| v.parse().ok()),
        hash: non_empty(HASH),
    }
}

fn unescape(raw: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_omits_trailing_fields() {
        assert_eq!(encode_column(&ColumnSpec::new("name")), "name");
        assert_eq!(
            encode_column(&ColumnSpec::new("age").sorted(1, Order::Desc)),
            "age:1:desc"
        );
        assert_eq!(
            encode_column(&ColumnSpec::new("email").filtered("^a")),
            "email:::%5Ea"
        );
    }

    #[test]
    fn test_encode_escapes_separators() {
        let spec = ColumnSpec::new("a:b,c").filtered("x,y:z");
        let encoded = encode_column(&spec);
        assert_eq!(encoded, "a%3Ab%2Cc:::x%2Cy%3Az");
        assert_eq!(decode_column(&encoded), Some(spec));
    }

    #[test]
    fn test_decode_drops_malformed_tuples_only() {
        let specs = decode_columns("name:0:asc,:1,age:x,email:::,bad::up,city:2,a:1:asc:f:extra,name");
        assert_eq!(
            specs,
            vec![
                ColumnSpec::new("name").sorted(0, Order::Asc),
                ColumnSpec::new("email"),
                ColumnSpec {
                    path: "city".into(),
                    sort_index: Some(2),
                    order: None,
                    filter: None,
                },
            ]
        );
    }

    #[test]
    fn test_decode_order_requires_sort_index() {
        assert_eq!(decode_column("name::desc"), None);
    }

    #[test]
    fn test_decode_missing_keys_is_default() {
        assert_eq!(decode(&Params::new()), TableConfig::default());
    }

    #[test]
    fn test_decode_ignores_garbage_snapshot() {
        let params = Params::new().with(SNAPSHOT_ID, "soon").with(RESOURCE_ID, "");
        let config = decode(&params);
        assert_eq!(config.snapshot_id, None);
        assert_eq!(config.resource_id, None);
    }

    #[test]
    fn test_round_trip() {
        let configs = [
            TableConfig::default(),
            TableConfig::new().with_columns(vec![]),
            TableConfig {
                columns: Some(vec![
                    ColumnSpec::new("name").sorted(0, Order::Desc),
                    ColumnSpec::new("address.city").sorted(1, Order::Asc).filtered("^(Oslo|Bergen)$"),
                    ColumnSpec::new("tags").filtered("a,b:c d%"),
                    ColumnSpec::new("email"),
                ]),
                resource_id: Some("42".into()),
                filter: Some("active".into()),
                snapshot_id: Some(1_700_000_000_000),
                hash: Some("abc123".into()),
            },
        ];

        for config in configs {
            assert_eq!(decode(&encode(&config)), config);
            let through_query = Params::from_query(&encode(&config).to_query());
            assert_eq!(decode(&through_query), config);
        }
    }

    #[test]
    fn test_column_specs_follow_rendering_order() {
        let layout = ColumnLayout::new(
            vec![
                Column::new("email"),
                Column::new("name").filtered("^A"),
                Column::new("age"),
                Column::new("hidden").included(false),
            ],
            vec!["age".into()],
            vec!["name".into(), "email".into()],
        )
        .unwrap();

        assert_eq!(
            encode_columns(&column_specs(&layout)),
            "age:0:asc,name:::%5EA,email"
        );
    }
}
