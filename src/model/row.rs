use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single table row.
///
/// Rows carry an order key (`order`) that defines a total order over every row
/// in the table, independent of which group the row belongs to. Groups are not
/// stored anywhere; they are the sets of rows sharing a `group` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub group: String,
    pub order: f64,
    /// Number of rows the group cell spans. Set on the first member of each
    /// group only; `None` everywhere else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<usize>,
    /// Display payload (name, category, quantity, ...). Values keep whatever
    /// type the file gave them. Never inspected by the ordering code.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<String>, group: impl Into<String>, order: f64) -> Self {
        Row {
            id: id.into(),
            group: group.into(),
            order,
            span: None,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style payload setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a payload field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A payload field as display text. Strings print bare, everything else
    /// in its JSON form.
    pub fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.fields.get(key).map(|value| match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        })
    }

    /// True if this row is the header (span anchor) of its group
    pub fn is_header(&self) -> bool {
        self.span.is_some()
    }
}

/// Sort rows ascending by order key.
///
/// Keys are expected to be finite; `total_cmp` keeps the sort total even if a
/// NaN slips in from a hand-edited file.
pub fn sort_by_order(rows: &mut [Row]) {
    rows.sort_by(|a, b| a.order.total_cmp(&b.order));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_order() {
        let mut rows = vec![
            Row::new("c", "g", 3.0),
            Row::new("a", "g", 0.5),
            Row::new("b", "h", 1.25),
        ];
        sort_by_order(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_payload_fields_keep_insertion_order() {
        let row = Row::new("r1", "fruit", 1.0)
            .with_field("name", "Apple")
            .with_field("qty", 3);
        let keys: Vec<&String> = row.fields.keys().collect();
        assert_eq!(keys, vec!["name", "qty"]);
        assert_eq!(row.field("qty"), Some(&Value::from(3)));
        assert_eq!(row.field("missing"), None);
        assert!(!row.is_header());
    }

    #[test]
    fn test_field_text() {
        let row = Row::new("r1", "fruit", 1.0)
            .with_field("name", "Apple")
            .with_field("qty", 3)
            .with_field("weight", 0.25)
            .with_field("organic", true)
            .with_field("tags", serde_json::json!(["red", "sweet"]));
        assert_eq!(row.field_text("name").as_deref(), Some("Apple"));
        assert_eq!(row.field_text("qty").as_deref(), Some("3"));
        assert_eq!(row.field_text("weight").as_deref(), Some("0.25"));
        assert_eq!(row.field_text("organic").as_deref(), Some("true"));
        assert_eq!(row.field_text("tags").as_deref(), Some(r#"["red","sweet"]"#));
        assert_eq!(row.field_text("missing"), None);
    }

    #[test]
    fn test_toml_payload_keeps_types() {
        let row: Row = toml::from_str(
            "id = \"r1\"\ngroup = \"fruit\"\norder = 1.0\nname = \"Apple\"\nqty = 3\nripe = false\n",
        )
        .unwrap();
        assert_eq!(row.field("qty"), Some(&Value::from(3)));
        assert_eq!(row.field("ripe"), Some(&Value::from(false)));
        assert_eq!(row.field_text("name").as_deref(), Some("Apple"));
    }

    #[test]
    fn test_json_flattens_payload() {
        let mut row = Row::new("r1", "fruit", 2.5).with_field("name", "Apple");
        row.span = Some(2);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "Apple");
        assert_eq!(json["span"], 2);
        assert_eq!(json["order"], 2.5);

        let back: Row = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_json_omits_empty_span() {
        let row = Row::new("r1", "fruit", 1.0);
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("span"));
    }
}
