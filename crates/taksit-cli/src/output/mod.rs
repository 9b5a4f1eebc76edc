pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, turkish: bool, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value, turkish),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The computation payload: the envelope's `result`, or the value itself.
pub(crate) fn payload(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First array of row objects under `value`, depth-first (the schedule for
/// both `amortize` and `plan` output).
pub(crate) fn find_rows(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => Some(arr.as_slice()),
        Value::Object(map) => map.values().find_map(find_rows),
        _ => None,
    }
}

/// Scalar fields of an object with nested keys joined by `.`; arrays skipped.
pub(crate) fn flatten_scalars(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_scalars(&name, val, out);
            }
        }
        Value::Array(_) => {}
        scalar => out.push((prefix.to_string(), scalar.clone())),
    }
}

pub(crate) fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan_like() -> Value {
        json!({
            "result": {
                "terms": { "principal": "1000", "period_count": 2 },
                "result": {
                    "periodic_payment": "537.80",
                    "schedule": [
                        { "period_index": 1, "remaining_balance": "512.19" },
                        { "period_index": 2, "remaining_balance": "0" }
                    ]
                }
            },
            "warnings": []
        })
    }

    #[test]
    fn test_find_rows_descends_into_nested_result() {
        let value = plan_like();
        let rows = find_rows(payload(&value)).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_flatten_scalars_skips_arrays() {
        let mut out = Vec::new();
        flatten_scalars("", payload(&plan_like()), &mut out);
        let keys: Vec<&str> = out.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"terms.principal"));
        assert!(keys.contains(&"result.periodic_payment"));
        assert!(!keys.iter().any(|k| k.contains("schedule")));
    }

    #[test]
    fn test_find_rows_none_for_scalar_result() {
        let value = json!({ "result": { "n": 5, "value": "120" } });
        assert!(find_rows(payload(&value)).is_none());
    }
}
