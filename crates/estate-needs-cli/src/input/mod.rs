pub mod file;
pub mod stdin;

use chrono::Datelike;
use serde_json::{Map, Value};

use estate_needs_core::tax::TaxBracketTable;

/// JSON input from `--input`, falling back to piped stdin.
pub fn read_input(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json_value(path);
    }
    stdin::read_stdin()?
        .ok_or_else(|| "no input: pass --input <file.json> or pipe JSON on stdin".into())
}

/// Put the bracket table from `--brackets` into `value["tax_brackets"]`.
///
/// The flag wins over a table already present in the input. Without either
/// the command cannot run.
pub fn apply_brackets(
    value: &mut Value,
    brackets: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let obj = value
        .as_object_mut()
        .ok_or("input must be a JSON object")?;
    match brackets {
        Some(path) => {
            let table = load_brackets(path)?;
            obj.insert("tax_brackets".into(), serde_json::to_value(table)?);
        }
        None if !obj.contains_key("tax_brackets") => {
            return Err("no tax bracket table: pass --brackets <file> or include \
                        \"tax_brackets\" in the input"
                .into());
        }
        None => {}
    }
    Ok(())
}

/// Read and validate a bracket table file (YAML or JSON).
pub fn load_brackets(path: &str) -> Result<TaxBracketTable, Box<dyn std::error::Error>> {
    let table: TaxBracketTable = file::read_config(path)?;
    table
        .validate()
        .map_err(|e| format!("invalid bracket table '{path}': {e}"))?;
    log::debug!(
        "loaded brackets for {} province(s) from {path}",
        table.provinces().count()
    );
    Ok(table)
}

/// Set the current year at `path` (e.g. `["timeline", "current_year"]`).
///
/// An explicit year always wins; otherwise a year already in the input is
/// kept, and only a missing one defaults to the local calendar year.
pub fn apply_current_year(
    value: &mut Value,
    path: &[&str],
    year: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (field, parents) = path.split_last().ok_or("empty field path")?;
    let mut target = value;
    for key in parents {
        target = target
            .as_object_mut()
            .ok_or("input must be a JSON object")?
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    let obj = target
        .as_object_mut()
        .ok_or_else(|| format!("'{}' must be a JSON object", parents.join(".")))?;
    match year {
        Some(y) => {
            obj.insert(field.to_string(), Value::from(y));
        }
        None => {
            obj.entry(field.to_string())
                .or_insert_with(|| Value::from(chrono::Local::now().year()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_year_overrides_input() {
        let mut v = json!({"current_year": 2020});
        apply_current_year(&mut v, &["current_year"], Some(2024)).unwrap();
        assert_eq!(v["current_year"], 2024);
    }

    #[test]
    fn test_input_year_kept_without_flag() {
        let mut v = json!({"timeline": {"current_year": 2020, "life_expectancy": 86}});
        apply_current_year(&mut v, &["timeline", "current_year"], None).unwrap();
        assert_eq!(v["timeline"]["current_year"], 2020);
        assert_eq!(v["timeline"]["life_expectancy"], 86);
    }

    #[test]
    fn test_missing_year_defaults_to_today() {
        let mut v = json!({});
        apply_current_year(&mut v, &["timeline", "current_year"], None).unwrap();
        assert_eq!(v["timeline"]["current_year"], chrono::Local::now().year());
    }

    #[test]
    fn test_brackets_required_somewhere() {
        let mut v = json!({"client": {}});
        assert!(apply_brackets(&mut v, None).is_err());
        let mut v = json!({"tax_brackets": {}});
        assert!(apply_brackets(&mut v, None).is_ok());
    }
}
