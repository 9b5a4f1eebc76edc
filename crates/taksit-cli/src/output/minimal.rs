use serde_json::Value;

use super::{payload, plain_value};

/// Headline fields, in priority order.
const PRIORITY_KEYS: [&str; 3] = ["periodic_payment", "value", "total_payment"];

/// Print just the key answer value from the output.
///
/// Looks in the payload, then one level down in a nested `result` (loan
/// plans), then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let body = payload(value);
    println!("{}", headline(body).unwrap_or_else(|| plain_value(body)));
}

fn headline(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    let nested = map.get("result").and_then(Value::as_object);

    for key in PRIORITY_KEYS {
        let found = map.get(key).or_else(|| nested.and_then(|n| n.get(key)));
        if let Some(val) = found.filter(|v| !v.is_null()) {
            return Some(plain_value(val));
        }
    }

    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, plain_value(val)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_from_schedule_output() {
        let body = json!({ "periodic_payment": "537.80", "total_payment": "1075.60" });
        assert_eq!(headline(&body).unwrap(), "537.80");
    }

    #[test]
    fn test_payment_from_nested_plan() {
        let body = json!({ "frequency": "monthly", "result": { "periodic_payment": "100" } });
        assert_eq!(headline(&body).unwrap(), "100");
    }

    #[test]
    fn test_combinatorics_value() {
        let body = json!({ "n": 5, "value": "120" });
        assert_eq!(headline(&body).unwrap(), "120");
    }
}
