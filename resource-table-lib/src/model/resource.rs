//! Resource selector and items

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Names the kind of resource a table browses.
///
/// Used as the leading path segment of every API request.
///
/// # Examples
///
/// ```
/// use resource_table_lib::model::ResourceName;
///
/// let resource = ResourceName::new("users");
/// assert_eq!(resource.as_str(), "users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a resource name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One concrete resource row as returned by the server.
///
/// `id` is stable across snapshots. Every other property is kept verbatim
/// and addressed by column path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    /// Stable resource identifier.
    pub id: String,
    /// Remaining properties.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResourceItem {
    /// Creates an item with no properties besides its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Adds a property.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Looks up a property by dotted path (`address.city`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }
}
