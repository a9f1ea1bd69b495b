//! Field edit payloads

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Reference to the resource a field edit applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource identifier.
    pub id: String,
}

/// A single-field edit sent to the server.
///
/// # Example
///
/// ```ignore
/// let field = TableField::new("42", "name", "Ada");
/// let item = controller.patch_field(field).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableField {
    /// The edited resource.
    pub resource: ResourceRef,
    /// Column path of the edited property.
    pub path: String,
    /// New value.
    pub value: Value,
}

impl TableField {
    /// Creates a field edit.
    pub fn new(resource_id: impl Into<String>, path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            resource: ResourceRef {
                id: resource_id.into(),
            },
            path: path.into(),
            value: value.into(),
        }
    }

    /// Returns the id of the edited resource.
    pub fn resource_id(&self) -> &str {
        &self.resource.id
    }
}
