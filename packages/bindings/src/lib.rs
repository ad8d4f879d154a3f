use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use estate_needs_core::needs::NeedsReportInput;
use estate_needs_core::series::ProjectionInput;
use estate_needs_core::tax::capital_gains::TaxBurdenInput;
use estate_needs_core::valuation::projection::ValuationQuery;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    raw.trim()
        .parse()
        .map_err(|e| to_napi_error(format!("Invalid {field} '{raw}': {e}")))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_insurable_needs(input_json: String) -> NapiResult<String> {
    let input: NeedsReportInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        estate_needs_core::needs::assess_insurable_needs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_series(input_json: String) -> NapiResult<String> {
    let input: ProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = estate_needs_core::series::project_series(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single calculations
// ---------------------------------------------------------------------------

#[napi]
pub fn value_at_year(input_json: String) -> NapiResult<String> {
    let query: ValuationQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        estate_needs_core::valuation::projection::value_entity(&query).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_tax_burden(input_json: String) -> NapiResult<String> {
    let input: TaxBurdenInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = estate_needs_core::tax::capital_gains::assess_tax_burden(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Decimal amounts cross the boundary as strings to keep full precision.
#[napi]
pub fn insured_income_amount(annual_income: String, age: u32) -> NapiResult<String> {
    let income = parse_decimal("annual income", &annual_income)?;
    Ok(estate_needs_core::needs::insured_income_amount(income, age).to_string())
}

#[napi]
pub fn want(need: String, priority: i32) -> NapiResult<String> {
    let need = parse_decimal("need", &need)?;
    let want = estate_needs_core::needs::want(need, priority).map_err(to_napi_error)?;
    Ok(want.to_string())
}
