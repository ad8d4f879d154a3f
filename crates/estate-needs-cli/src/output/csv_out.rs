use serde_json::Value;
use std::io;

use super::{record_headers, record_row, scalar_text};

/// Write output as CSV to stdout.
///
/// A bare array (e.g. `series --only net-worth`) becomes one row per
/// record; an envelope becomes `field,value` pairs of its result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Array(records) => write_records(&mut wtr, records),
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in fields {
                let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, records: &[Value]) {
    let headers = record_headers(records);
    if headers.is_empty() {
        for item in records {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for map in records.iter().filter_map(Value::as_object) {
        let _ = wtr.write_record(record_row(map, &headers));
    }
}
