use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{record_headers, record_row, scalar_text};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in one Field/Value table; every list of records
/// in the result (need lines, series, coverage) gets a table of its own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_fields(map),
        },
        Value::Array(records) => print_records(records),
        _ => println!("{value}"),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let mut scalars = Map::new();
    let mut lists: Vec<(&str, &[Value])> = Vec::new();
    for (key, val) in result {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                lists.push((key.as_str(), items.as_slice()));
            }
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }

    if !scalars.is_empty() {
        print_fields(&scalars);
    }
    for (name, records) in lists {
        println!("\n{name}:");
        print_records(records);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_records(records: &[Value]) {
    if records.is_empty() {
        println!("(empty)");
        return;
    }

    let headers = record_headers(records);
    if headers.is_empty() {
        for item in records {
            println!("{}", format_cell(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for map in records.iter().filter_map(Value::as_object) {
        builder.push_record(record_row(map, &headers));
    }
    println!("{}", Table::from(builder));
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", scalar_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => scalar_text(value),
    }
}
