//! Page Models
//!
//! Row identifiers, hover configuration and the JSON shapes exchanged with
//! the record endpoint and the login handler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id prefix on listing rows
pub const ROW_PREFIX: &str = "row_";
/// Id prefix on category sliders
pub const CATEGORY_PREFIX: &str = "category_";

/// Record id taken from a prefixed element id (`row_42` -> `42`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowId(String);

impl RowId {
    /// Parse an element id carrying `prefix`. `None` when the prefix is
    /// missing or nothing follows it.
    pub fn from_element_id(element_id: &str, prefix: &str) -> Option<Self> {
        leptos_hover::id_suffix(element_id, prefix).map(|id| RowId(id.to_string()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of a sibling element keyed by this row (`edit` -> `edit_42`)
    pub fn element_id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.0)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered icon id prefixes revealed on hover
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconSet(Vec<String>);

impl IconSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IconSet(prefixes.into_iter().map(Into::into).collect())
    }

    /// Element ids of this set's icons for one row, in configured order
    pub fn element_ids(&self, row: &RowId) -> Vec<String> {
        self.0.iter().map(|prefix| row.element_id(prefix)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Hover/row-action settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// CSS class shared by every listing row
    pub row_class: String,
    /// Icons to reveal on hover
    pub icons: IconSet,
    /// Free-form page tag (e.g. "house", "category")
    pub kind: Option<String>,
    /// Hide the icons again when the pointer leaves the row
    pub hide_on_leave: bool,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            row_class: "hover-row".to_string(),
            icons: IconSet::new(["edit", "delete"]),
            kind: None,
            hide_on_leave: false,
        }
    }
}

/// Record returned by the fetch endpoint, matched against form field names
pub type RecordPayload = Map<String, Value>;

/// Render a payload value the way it should appear in a form field
pub fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Delete target recorded by the last delete-intent click
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub id: RowId,
    pub summary: String,
}

/// Response to a `type=delete` POST
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from the login handler
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub location: Option<String>,
}

/// Accept the id either as a JSON number or a string
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_id_from_element_id() {
        let id = RowId::from_element_id("row_42", ROW_PREFIX).unwrap();
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.element_id("edit"), "edit_42");
    }

    #[test]
    fn test_row_id_rejects_unprefixed() {
        assert!(RowId::from_element_id("house-42", ROW_PREFIX).is_none());
        assert!(RowId::from_element_id("row_", ROW_PREFIX).is_none());
    }

    #[test]
    fn test_icon_set_element_ids_keep_order() {
        let icons = IconSet::new(["delete", "edit", "grade"]);
        let ids = icons.element_ids(&RowId::new("9"));
        assert_eq!(ids, vec!["delete_9", "edit_9", "grade_9"]);
    }

    #[test]
    fn test_hover_config_defaults_fill_missing_fields() {
        let config: HoverConfig = serde_json::from_value(json!({ "row_class": "house-row" })).unwrap();
        assert_eq!(config.row_class, "house-row");
        assert_eq!(config.icons, IconSet::new(["edit", "delete"]));
        assert!(!config.hide_on_leave);
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!("Oak St")), "Oak St");
        assert_eq!(field_text(&json!(3)), "3");
        assert_eq!(field_text(&json!(true)), "true");
        assert_eq!(field_text(&json!(null)), "");
    }

    #[test]
    fn test_delete_response_accepts_numeric_id() {
        let resp: DeleteResponse = serde_json::from_value(json!({ "id": 42, "name": "Oak St" })).unwrap();
        assert_eq!(resp.id, "42");
        assert_eq!(resp.name.as_deref(), Some("Oak St"));

        let resp: DeleteResponse = serde_json::from_value(json!({ "id": "7" })).unwrap();
        assert_eq!(resp.id, "7");
        assert!(resp.name.is_none());
    }

    #[test]
    fn test_login_response_location_optional() {
        let resp: LoginResponse = serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(!resp.success);
        assert!(resp.location.is_none());
    }
}
