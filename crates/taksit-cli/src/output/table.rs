use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use taksit_core::numeric::format::{format_amount, format_percent};

use super::{find_rows, flatten_scalars, payload, plain_value};

/// Format output as tables: summary fields first, then the schedule rows.
pub fn print_table(value: &Value, turkish: bool) {
    let body = payload(value);

    let mut fields = Vec::new();
    flatten_scalars("", body, &mut fields);
    if !fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &fields {
            builder.push_record([key.clone(), display_value(key, val, turkish)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(rows) = find_rows(body) {
        println!();
        print_rows(rows, turkish);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value], turkish: bool) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| display_value(h, v, turkish))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}

/// Decimal strings become Turkish-locale amounts (or percentages for rate
/// fields) when requested; everything else prints as-is.
fn display_value(key: &str, value: &Value, turkish: bool) -> String {
    if turkish {
        if let Value::String(s) = value {
            if let Ok(d) = Decimal::from_str(s) {
                return if key.ends_with("rate") {
                    format_percent(d, 2)
                } else {
                    format_amount(d, 2)
                };
            }
        }
    }
    plain_value(value)
}
