use clap::{Args, ValueEnum};
use serde_json::Value;

use estate_needs_core::series::{self, ProjectionInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeriesKind {
    NetWorth,
    Diversification,
    TaxBurden,
    EbitdaContribution,
    ShareValue,
    StakeholderCoverage,
}

impl SeriesKind {
    fn field(self) -> &'static str {
        match self {
            SeriesKind::NetWorth => "net_worth",
            SeriesKind::Diversification => "diversification",
            SeriesKind::TaxBurden => "tax_burden",
            SeriesKind::EbitdaContribution => "ebitda_contribution",
            SeriesKind::ShareValue => "share_value",
            SeriesKind::StakeholderCoverage => "stakeholder_coverage",
        }
    }
}

/// Arguments for year-by-year projections
#[derive(Args)]
pub struct SeriesArgs {
    /// Path to JSON input file (client, assets, businesses)
    #[arg(long)]
    pub input: Option<String>,

    /// Tax bracket table (YAML or JSON); overrides `tax_brackets` in the input
    #[arg(long)]
    pub brackets: Option<String>,

    /// Calendar year the projection starts from (default: this year)
    #[arg(long)]
    pub current_year: Option<i32>,

    /// Print only this series, one row per year
    #[arg(long, value_enum)]
    pub only: Option<SeriesKind>,
}

pub fn run_series(args: SeriesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = input::read_input(args.input.as_deref())?;
    input::apply_brackets(&mut value, args.brackets.as_deref())?;
    input::apply_current_year(&mut value, &["current_year"], args.current_year)?;

    let projection_input: ProjectionInput = serde_json::from_value(value)?;
    let output = series::project_series(&projection_input)?;
    let mut json = serde_json::to_value(output)?;

    match args.only {
        Some(kind) => Ok(json["result"][kind.field()].take()),
        None => Ok(json),
    }
}
