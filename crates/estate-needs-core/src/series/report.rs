use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::entities::{Asset, Business, Client};
use crate::series::business::{
    ebitda_contribution_series, share_value_series, stakeholder_coverage, CoverageLine,
};
use crate::series::estate::{
    diversification_series, net_worth_series, tax_burden_series, TaxBurdenPoint,
};
use crate::series::YearPoint;
use crate::tax::TaxBracketTable;
use crate::types::{with_metadata, ComputationOutput};
use crate::EngineResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub current_year: i32,
    pub client: Client,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub businesses: Vec<Business>,
    pub tax_brackets: TaxBracketTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub life_expectancy_year: i32,
    pub net_worth: Vec<YearPoint>,
    pub diversification: Vec<YearPoint>,
    pub tax_burden: Vec<TaxBurdenPoint>,
    pub ebitda_contribution: Vec<YearPoint>,
    pub share_value: Vec<YearPoint>,
    pub stakeholder_coverage: Vec<CoverageLine>,
}

/// All year-indexed series for the client's report.
pub fn project_series(input: &ProjectionInput) -> EngineResult<ComputationOutput<ProjectionSeries>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let timeline = input.client.timeline(input.current_year);
    let end_year = input.client.life_expectancy_year(input.current_year)?;

    if end_year == input.current_year {
        warnings.push(format!(
            "Client age {} is at or past life expectancy {}; estate series end this year",
            input.client.age, input.client.life_expectancy
        ));
    }
    if !input.businesses.is_empty()
        && input
            .businesses
            .iter()
            .all(|b| b.key_people.is_empty() && b.shareholders.is_empty())
    {
        warnings.push("Businesses have no key people or shareholders; business series are empty".into());
    }

    let mut coverage = Vec::new();
    for business in &input.businesses {
        coverage.extend(stakeholder_coverage(business, timeline)?);
    }

    let output = ProjectionSeries {
        life_expectancy_year: end_year,
        net_worth: net_worth_series(&input.assets, &input.businesses, end_year, timeline)?,
        diversification: diversification_series(
            &input.assets,
            &input.businesses,
            end_year,
            timeline,
        )?,
        tax_burden: tax_burden_series(
            &input.assets,
            &input.businesses,
            input.client.province,
            &input.tax_brackets,
            end_year,
            timeline,
        )?,
        ebitda_contribution: ebitda_contribution_series(&input.businesses, timeline)?,
        share_value: share_value_series(&input.businesses, timeline)?,
        stakeholder_coverage: coverage,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Year-by-year projections: net worth and diversification to life \
         expectancy, deemed-disposition tax burden, key-person EBITDA and \
         shareholder value with growth capped at five years",
        &serde_json::json!({
            "current_year": input.current_year,
            "life_expectancy": input.client.life_expectancy,
            "province": input.client.province.code(),
            "num_assets": input.assets.len(),
            "num_businesses": input.businesses.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
