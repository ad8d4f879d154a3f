use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use estate_needs_core::entities::Province;
use estate_needs_core::tax::capital_gains::{self, TaxBurdenInput};
use estate_needs_core::tax::{capital_gains_tax_burden, select_bracket};

use crate::input;

/// Arguments for the deemed-disposition tax burden at a year
#[derive(Args)]
pub struct TaxBurdenArgs {
    /// Path to JSON input file `{province, year, timeline, assets, businesses}`
    #[arg(long)]
    pub input: Option<String>,

    /// Tax bracket table (YAML or JSON); overrides `tax_brackets` in the input
    #[arg(long)]
    pub brackets: Option<String>,

    /// Calendar year of the recorded current values (default: this year)
    #[arg(long)]
    pub current_year: Option<i32>,
}

/// Arguments for a single bracket lookup
#[derive(Args)]
pub struct BracketArgs {
    /// Tax bracket table (YAML or JSON)
    #[arg(long)]
    pub brackets: String,

    /// Two-letter province code (e.g. ON)
    #[arg(long)]
    pub province: Province,

    /// Amount to look up; also treated as total capital gains for the burden
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Decimal,
}

pub fn run_tax_burden(args: TaxBurdenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = input::read_input(args.input.as_deref())?;
    input::apply_brackets(&mut value, args.brackets.as_deref())?;
    input::apply_current_year(&mut value, &["timeline", "current_year"], args.current_year)?;

    let burden_input: TaxBurdenInput = serde_json::from_value(value)?;
    let result = capital_gains::assess_tax_burden(&burden_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_bracket(args: BracketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::load_brackets(&args.brackets)?;
    let bracket = select_bracket(&table, args.province, args.amount)?;
    let burden = capital_gains_tax_burden(args.amount, args.province, &table)?;
    Ok(serde_json::json!({
        "result": {
            "province": args.province,
            "amount": args.amount,
            "min_income": bracket.min_income,
            "tax_rate": bracket.tax_rate,
            "dividend_eligible_rate": bracket.dividend_eligible_rate,
            "dividend_non_eligible_rate": bracket.dividend_non_eligible_rate,
            "capital_gains_tax_burden": burden,
        }
    }))
}
