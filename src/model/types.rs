//! Record and field value types.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A single field value. Missing fields are represented by `None` at lookup time,
/// never by a sentinel variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Textual form used when building search haystacks.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Integer(n) => Cow::Owned(n.to_string()),
            FieldValue::Float(f) => Cow::Owned(f.to_string()),
        }
    }

    /// Convert a JSON scalar. `null`, `false`, arrays and objects have no field value.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_f64().map(FieldValue::Float)),
            Value::Bool(true) => Some(FieldValue::Text("true".to_string())),
            Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// Anything the paginator can run a text search over.
///
/// Implementors return the text of a named field, or `None` when the field is absent.
/// Absent fields contribute an empty string to the search haystack.
pub trait Searchable {
    fn field_text(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// A dynamically shaped record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build a record from a JSON object, dropping fields with no scalar value.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = object
            .iter()
            .filter_map(|(name, value)| FieldValue::from_json(value).map(|v| (name.clone(), v)))
            .collect();
        Self { fields }
    }
}

impl Searchable for Record {
    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(FieldValue::as_text)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(FieldValue::Integer(0).as_text(), "0");
        assert_eq!(FieldValue::Float(3.0).as_text(), "3");
        assert_eq!(FieldValue::Float(2.5).as_text(), "2.5");
    }

    #[test]
    fn json_object_drops_non_scalars() {
        let value = json!({
            "id": 7,
            "title": "Quran Recitation",
            "ratio": 0.5,
            "published": true,
            "description": null,
            "courses": [1, 2],
            "meta": {"a": 1}
        });
        let record = Record::from_json_object(value.as_object().unwrap());
        assert_eq!(record.len(), 4);
        assert_eq!(record.get("id"), Some(&FieldValue::Integer(7)));
        assert_eq!(record.get("ratio"), Some(&FieldValue::Float(0.5)));
        assert_eq!(record.field_text("published").as_deref(), Some("true"));
        assert!(record.get("description").is_none());
        assert!(record.get("courses").is_none());
    }

    #[test]
    fn false_is_absent_and_not_searchable() {
        let value = json!({"title": "Draft", "published": false});
        let record = Record::from_json_object(value.as_object().unwrap());
        assert!(record.get("published").is_none());
        let query = crate::search::NormalizedQuery::parse("false");
        assert!(!query.matches(&record, &["title", "published"]));
    }

    #[test]
    fn missing_field_is_none_not_empty() {
        let record = Record::new().with("name", "Apple");
        assert_eq!(record.field_text("name").as_deref(), Some("Apple"));
        assert!(record.field_text("color").is_none());
    }

    #[test]
    fn record_serializes_as_flat_object() {
        let record = Record::new().with("id", 1).with("name", "Apple");
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out, json!({"id": 1, "name": "Apple"}));
    }
}
