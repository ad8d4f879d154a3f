use serde_json::Value;

use super::scalar_text;

/// Result fields worth printing on their own, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "total_want",
    "want",
    "value",
    "tax_burden",
    "capital_gains_tax_burden",
    "amount",
    "life_expectancy_year",
];

/// Print just the headline figure of the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let headline = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null());
        if let Some(val) = headline {
            println!("{}", scalar_text(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result_obj));
}
