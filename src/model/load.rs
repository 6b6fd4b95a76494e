//! Loading datasets from JSON.
//!
//! Accepts either a bare array of objects or the admin backend's response envelope
//! (`{"success": true, "data": [...]}`). Anything that is not a sequence becomes an
//! empty dataset, matching the paginator's "non-sequence means empty" rule.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::Record;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read records from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and normalize a JSON record file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&contents)?;
    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Parse records from a JSON string.
pub fn parse_records(json: &str) -> Result<Vec<Record>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(records_from_value(&value))
}

/// Normalize an already-parsed JSON value into records.
///
/// Array elements that are not objects are skipped.
pub fn records_from_value(value: &Value) -> Vec<Record> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => {
                if map.get("success") == Some(&Value::Bool(false)) {
                    warn!("response envelope reports success=false; using its data anyway");
                }
                items
            }
            _ => {
                warn!("JSON object has no `data` array; treating as empty dataset");
                return Vec::new();
            }
        },
        other => {
            warn!(kind = json_kind(other), "JSON input is not a sequence; treating as empty dataset");
            return Vec::new();
        }
    };

    let records: Vec<Record> = items
        .iter()
        .filter_map(|item| item.as_object().map(Record::from_json_object))
        .collect();
    if records.len() != items.len() {
        debug!(
            skipped = items.len() - records.len(),
            "skipped non-object array elements"
        );
    }
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::FieldValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn bare_array_loads_in_order() {
        let records = parse_records(r#"[{"id":1,"title":"A"},{"id":2,"title":"B"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&FieldValue::Integer(1)));
        assert_eq!(records[1].get("title"), Some(&FieldValue::Text("B".into())));
    }

    #[test]
    fn envelope_data_is_unwrapped() {
        let records =
            parse_records(r#"{"success":true,"data":[{"title":"Ramadan Kareem"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn non_sequence_becomes_empty() {
        assert!(parse_records("42").unwrap().is_empty());
        assert!(parse_records(r#""text""#).unwrap().is_empty());
        assert!(parse_records(r#"{"success":true}"#).unwrap().is_empty());
        assert!(parse_records("null").unwrap().is_empty());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let records = parse_records(r#"[1, {"id": 1}, "x", null]"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_records("[{").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn load_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"[{{"id": 1}}, {{"id": 2}}, {{"id": 3}}]"#)?;
        let records = load_records(file.path())?;
        assert_eq!(records.len(), 3);
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_records(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/records.json"));
    }
}
