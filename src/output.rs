//! Output formatting for CLI commands.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use serde::Serialize;
use serde_json::{json, Value};

/// Output settings from the global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    pub fields: Option<String>,
}

impl OutputControls {
    /// Render `data` as JSON, honouring `--fields` and `--compact`.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let value = serde_json::to_value(data).unwrap_or(json!(null));

        let filtered = match self.fields {
            Some(ref fields) => filter_fields(&value, fields),
            None => value,
        };

        if self.compact {
            serde_json::to_string(&filtered).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string_pretty(&filtered).unwrap_or_else(|_| "{}".to_string())
        }
    }

    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }
}

/// Keep only the listed keys of each object (recursing into arrays and
/// into objects that don't carry any of the keys, e.g. batch maps).
fn filter_fields(value: &Value, fields: &str) -> Value {
    let field_list: Vec<&str> = fields.split(',').map(|s| s.trim()).collect();

    match value {
        Value::Array(arr) => Value::Array(arr.iter().map(|v| filter_fields(v, fields)).collect()),
        Value::Object(map) => {
            if !field_list.iter().any(|f| map.contains_key(*f)) {
                let mut nested = serde_json::Map::new();
                for (k, v) in map {
                    nested.insert(k.clone(), filter_fields(v, fields));
                }
                return Value::Object(nested);
            }
            let mut filtered = serde_json::Map::new();
            for field in &field_list {
                if let Some(v) = map.get(*field) {
                    filtered.insert(field.to_string(), v.clone());
                }
            }
            Value::Object(filtered)
        }
        _ => value.clone(),
    }
}

/// Format an error as JSON.
pub fn format_error(error: &str) -> String {
    serde_json::to_string(&json!({
        "error": error,
        "success": false
    }))
    .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_filter_objects_in_array() {
        let controls = OutputControls {
            json: true,
            compact: true,
            fields: Some("job_id, match_score".to_string()),
        };
        let data = json!([{"job_id": "a", "match_score": 1.0, "confidence": "high"}]);
        assert_eq!(controls.emit(&data), r#"[{"job_id":"a","match_score":1.0}]"#);
    }

    #[test]
    fn test_fields_reach_into_keyed_maps() {
        let controls = OutputControls {
            json: true,
            compact: true,
            fields: Some("job_id".to_string()),
        };
        let data = json!({"1 Main St": {"job_id": "a", "confidence": "high"}, "2 Elm": null});
        let out: Value = serde_json::from_str(&controls.emit(&data)).unwrap();
        assert_eq!(out["1 Main St"], json!({"job_id": "a"}));
        assert_eq!(out["2 Elm"], Value::Null);
    }

    #[test]
    fn test_format_error() {
        let out: Value = serde_json::from_str(&format_error("boom")).unwrap();
        assert_eq!(out["success"], json!(false));
        assert_eq!(out["error"], json!("boom"));
    }
}
