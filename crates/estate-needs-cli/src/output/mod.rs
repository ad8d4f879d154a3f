pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Column headers for a list of records: `year` first when present, then
/// every other key seen in any record, in order of first appearance.
///
/// Series records do not all carry the same keys (an entity drops out of
/// the tax-burden series once sold), so the first record is not enough.
pub(crate) fn record_headers(records: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    let objects = records.iter().filter_map(Value::as_object);
    for map in objects {
        for key in map.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    if let Some(pos) = headers.iter().position(|h| h == "year") {
        let year = headers.remove(pos);
        headers.insert(0, year);
    }
    headers
}

pub(crate) fn record_row(map: &Map<String, Value>, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
        .collect()
}

/// Display text for a JSON value; nested values are re-encoded.
pub(crate) fn scalar_text(value: &Value) -> String {
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

    #[test]
    fn test_headers_union_with_year_first() {
        let records = vec![
            json!({"Cabin": "1", "year": 2024}),
            json!({"year": 2025, "Clinic": "2"}),
        ];
        assert_eq!(record_headers(&records), vec!["year", "Cabin", "Clinic"]);
    }

    #[test]
    fn test_missing_cells_are_blank() {
        let headers = vec!["year".to_string(), "Cabin".to_string()];
        let row = record_row(json!({"year": 2030}).as_object().unwrap(), &headers);
        assert_eq!(row, vec!["2030".to_string(), String::new()]);
    }
}
