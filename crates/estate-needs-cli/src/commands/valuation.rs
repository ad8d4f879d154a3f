use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use estate_needs_core::entities::{Asset, ValuableRecord};
use estate_needs_core::types::Timeline;
use estate_needs_core::valuation::projection::{self, ValuationQuery};

use crate::input;

/// Arguments for valuing one asset or business at a year
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValueArgs {
    /// Path to JSON input file `{entity: {kind, ...}, year, timeline}`
    /// (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Year to value the entity at
    #[arg(long)]
    pub year: Option<i32>,

    /// Calendar year of the recorded current value (default: this year)
    #[arg(long)]
    pub current_year: Option<i32>,

    /// Client life expectancy (age); sets the horizon when no term is given
    #[arg(long)]
    pub life_expectancy: Option<i32>,

    /// Year the asset was acquired
    #[arg(long)]
    pub acquired_year: Option<i32>,

    /// Value at acquisition
    #[arg(long)]
    pub initial_value: Option<Decimal>,

    /// Value today
    #[arg(long)]
    pub current_value: Option<Decimal>,

    /// Annual growth rate, percent (e.g. 6 for 6%)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Years until the asset is sold (capped at 20)
    #[arg(long)]
    pub term: Option<Decimal>,
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let query: ValuationQuery = if let Some(ref path) = args.input {
        let mut value = input::file::read_json_value(path)?;
        input::apply_current_year(&mut value, &["timeline", "current_year"], args.current_year)?;
        serde_json::from_value(value)?
    } else if let Some(mut data) = input::stdin::read_stdin()? {
        input::apply_current_year(&mut data, &["timeline", "current_year"], args.current_year)?;
        serde_json::from_value(data)?
    } else {
        let life_expectancy = args
            .life_expectancy
            .ok_or("--life-expectancy is required (or provide --input)")?;
        let mut timeline = serde_json::json!({ "life_expectancy": life_expectancy });
        input::apply_current_year(&mut timeline, &["current_year"], args.current_year)?;
        let timeline: Timeline = serde_json::from_value(timeline)?;

        let asset = Asset {
            name: "asset".into(),
            asset_type: "Other".into(),
            acquired_year: args
                .acquired_year
                .ok_or("--acquired-year is required (or provide --input)")?,
            initial_value: args
                .initial_value
                .ok_or("--initial-value is required (or provide --input)")?,
            current_value: args
                .current_value
                .ok_or("--current-value is required (or provide --input)")?,
            growth_rate: args.growth_rate.unwrap_or(Decimal::ZERO),
            term: args.term,
            is_taxable: true,
            is_liquid: false,
            beneficiaries: vec![],
        };
        ValuationQuery {
            entity: ValuableRecord::Asset(asset),
            year: args.year.ok_or("--year is required (or provide --input)")?,
            timeline,
        }
    };

    let result = projection::value_entity(&query)?;
    Ok(serde_json::to_value(result)?)
}
