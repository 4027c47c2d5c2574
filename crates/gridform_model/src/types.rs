//! Column and cell definitions.
//!
//! Columns carry a name, a type, and an ordered list of selection
//! options. Options are only meaningful for [`ColumnType::Selection`];
//! once set they are retained (but inert) on every other type, so a
//! column that is switched away from `selection` and back keeps its
//! option list.

use serde::{Deserialize, Serialize};

/// The type of a column, driving the default value of its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free-form text
    Text,
    /// Checkbox-style boolean
    Boolean,
    /// Text constrained (by the UI, not the model) to an option list
    Selection,
    /// Base64 data URI payload
    Image,
}

impl ColumnType {
    /// The value a cell of this type starts from, on row creation and
    /// on retype. Image cells hold an empty string until content is
    /// attached.
    pub fn default_value(&self) -> CellValue {
        match self {
            ColumnType::Boolean => CellValue::Bool(false),
            ColumnType::Text | ColumnType::Selection | ColumnType::Image => {
                CellValue::Text(String::new())
            }
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Text
    }
}

/// A single cell value. Snapshots carry these as plain JSON strings and
/// booleans, so the enum is untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// The textual form of the cell, if it holds text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Bool(_) => None,
        }
    }
}

/// A column definition shared by all rows of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnRepr")]
pub struct Column {
    /// Display name. Also the key under which every row stores this
    /// column's cell. Uniqueness is not enforced.
    pub name: String,

    /// Current type. Retyping is destructive to cell contents.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Selection options, in display order. Inert for non-selection
    /// types.
    pub options: Vec<String>,
}

impl Column {
    /// Create a column with no options.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            options: Vec::new(),
        }
    }

    /// Set the option list.
    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = options.into_iter().map(|o| o.into()).collect();
        self
    }
}

/// Wire form of a column. Legacy documents stored columns as bare name
/// strings; those normalize to a text column with no options. Object
/// form tolerates missing `type` and `options` fields the same way.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Legacy(String),
    Full {
        name: String,
        #[serde(rename = "type", default)]
        column_type: ColumnType,
        #[serde(default)]
        options: Vec<String>,
    },
}

impl From<ColumnRepr> for Column {
    fn from(repr: ColumnRepr) -> Self {
        match repr {
            ColumnRepr::Legacy(name) => Column::new(name, ColumnType::Text),
            ColumnRepr::Full {
                name,
                column_type,
                options,
            } => Column {
                name,
                column_type,
                options,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_by_type() {
        assert_eq!(ColumnType::Boolean.default_value(), CellValue::Bool(false));
        assert_eq!(
            ColumnType::Text.default_value(),
            CellValue::Text(String::new())
        );
        assert_eq!(
            ColumnType::Selection.default_value(),
            CellValue::Text(String::new())
        );
        assert_eq!(
            ColumnType::Image.default_value(),
            CellValue::Text(String::new())
        );
    }

    #[test]
    fn test_column_type_tags_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&ColumnType::Selection).unwrap(),
            "\"selection\""
        );
        let parsed: ColumnType = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, ColumnType::Image);
    }

    #[test]
    fn test_cell_value_is_untagged() {
        assert_eq!(serde_json::to_string(&CellValue::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&CellValue::Text("hi".into())).unwrap(),
            "\"hi\""
        );

        let parsed: CellValue = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, CellValue::Bool(false));
    }

    #[test]
    fn test_legacy_bare_string_column() {
        let column: Column = serde_json::from_str("\"Status\"").unwrap();
        assert_eq!(column.name, "Status");
        assert_eq!(column.column_type, ColumnType::Text);
        assert!(column.options.is_empty());
    }

    #[test]
    fn test_object_column_with_missing_fields() {
        let column: Column = serde_json::from_str(r#"{"name": "Done"}"#).unwrap();
        assert_eq!(column.column_type, ColumnType::Text);
        assert!(column.options.is_empty());

        let column: Column =
            serde_json::from_str(r#"{"name": "Size", "type": "selection", "options": ["S", "M"]}"#)
                .unwrap();
        assert_eq!(column.column_type, ColumnType::Selection);
        assert_eq!(column.options, vec!["S", "M"]);
    }

    #[test]
    fn test_column_serializes_with_type_key() {
        let json = serde_json::to_string(&Column::new("Name", ColumnType::Text)).unwrap();
        assert!(json.contains("\"type\":\"text\""));
        assert!(json.contains("\"options\":[]"));
    }
}
