use serde_json::Value;
use std::io;

use super::{find_rows, flatten_scalars, payload, plain_value};

/// Write output as CSV to stdout: one line per schedule row when there is a
/// schedule, otherwise two columns of field and value.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let body = payload(value);

    match find_rows(body) {
        Some(rows) => write_rows(&mut wtr, rows),
        None => {
            let mut fields = Vec::new();
            flatten_scalars("", body, &mut fields);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in &fields {
                let _ = wtr.write_record([key.as_str(), &plain_value(val)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
