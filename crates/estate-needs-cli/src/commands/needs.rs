use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use estate_needs_core::needs::{self, NeedsReportInput};

use crate::input;

/// Arguments for the full insurable-needs report
#[derive(Args)]
pub struct NeedsArgs {
    /// Path to JSON input file (client, assets, businesses, beneficiaries,
    /// debts, goals, insurable_needs)
    #[arg(long)]
    pub input: Option<String>,

    /// Tax bracket table (YAML or JSON); overrides `tax_brackets` in the input
    #[arg(long)]
    pub brackets: Option<String>,

    /// Calendar year the report is run for (default: this year)
    #[arg(long)]
    pub current_year: Option<i32>,
}

/// Arguments for the age-banded income replacement amount
#[derive(Args)]
pub struct InsuredIncomeArgs {
    /// Annual income
    #[arg(long)]
    pub income: Decimal,

    /// Client age in whole years
    #[arg(long)]
    pub age: u32,
}

/// Arguments for scaling a need by priority
#[derive(Args)]
pub struct WantArgs {
    /// Full dollar need
    #[arg(long, allow_hyphen_values = true)]
    pub need: Decimal,

    /// Priority, 0-100
    #[arg(long, allow_hyphen_values = true)]
    pub priority: i32,
}

pub fn run_needs(args: NeedsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = input::read_input(args.input.as_deref())?;
    input::apply_brackets(&mut value, args.brackets.as_deref())?;
    input::apply_current_year(&mut value, &["current_year"], args.current_year)?;

    let report_input: NeedsReportInput = serde_json::from_value(value)?;
    let result = needs::assess_insurable_needs(&report_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_insured_income(args: InsuredIncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amount = needs::insured_income_amount(args.income, args.age);
    Ok(serde_json::json!({
        "result": {
            "annual_income": args.income,
            "age": args.age,
            "amount": amount,
        }
    }))
}

pub fn run_want(args: WantArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let want = needs::want(args.need, args.priority)?;
    Ok(serde_json::json!({
        "result": {
            "need": args.need,
            "priority": args.priority,
            "want": want,
        }
    }))
}
