use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::entities::{Asset, Business, Province, Valuable};
use crate::error::EngineError;
use crate::tax::brackets::{select_bracket, TaxBracket, TaxBracketTable};
use crate::types::{percent_to_fraction, with_metadata, ComputationOutput, Money, Timeline};
use crate::valuation::value_at_year;
use crate::EngineResult;

/// Gains up to this amount are included at the lower rate.
pub const INCLUSION_THRESHOLD: Decimal = dec!(250_000);
pub const LOWER_INCLUSION_RATE: Decimal = dec!(0.5);
pub const UPPER_INCLUSION_RATE: Decimal = dec!(0.67);

/// Gain on one entity at `year`. Non-taxable assets contribute nothing.
/// The result is negative when the projected value is below cost.
pub fn capital_gains(entity: Valuable<'_>, year: i32, timeline: Timeline) -> EngineResult<Money> {
    if !entity.is_taxable() {
        return Ok(Decimal::ZERO);
    }
    let value = value_at_year(entity, year, timeline)?;
    Ok(value - entity.profile().initial_value)
}

/// Combined gains across assets and businesses at `year`, never negative.
pub fn total_capital_gains(
    assets: &[Asset],
    businesses: &[Business],
    year: i32,
    timeline: Timeline,
) -> EngineResult<Money> {
    let mut total = Decimal::ZERO;
    for asset in assets {
        total += capital_gains(Valuable::Asset(asset), year, timeline)?;
    }
    for business in businesses {
        total += capital_gains(Valuable::Business(business), year, timeline)?;
    }
    Ok(total.max(Decimal::ZERO))
}

/// Tax owed on `total_gains` realized at once.
///
/// The marginal rate comes from the bracket selected by the gains amount
/// itself, not the client's income. Half of the first 250,000 is included;
/// 67% of anything above.
pub fn capital_gains_tax_burden(
    total_gains: Money,
    province: Province,
    table: &TaxBracketTable,
) -> EngineResult<Money> {
    let bracket = select_bracket(table, province, total_gains)?;
    Ok(burden_at_rate(total_gains, bracket))
}

fn burden_at_rate(total_gains: Money, bracket: &TaxBracket) -> Money {
    let rate = percent_to_fraction(bracket.tax_rate);
    if total_gains <= INCLUSION_THRESHOLD {
        total_gains * LOWER_INCLUSION_RATE * rate
    } else {
        INCLUSION_THRESHOLD * LOWER_INCLUSION_RATE * rate
            + (total_gains - INCLUSION_THRESHOLD) * UPPER_INCLUSION_RATE * rate
    }
}

// ---------------------------------------------------------------------------
// Envelope operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBurdenInput {
    pub province: Province,
    pub year: i32,
    pub timeline: Timeline,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub businesses: Vec<Business>,
    pub tax_brackets: TaxBracketTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityGain {
    pub name: String,
    pub gain: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBurdenOutput {
    pub year: i32,
    pub gains_by_entity: Vec<EntityGain>,
    pub total_gains: Money,
    pub bracket: TaxBracket,
    pub tax_burden: Money,
    pub effective_rate_on_gains: Decimal,
}

/// Deemed-disposition tax at `input.year` across all holdings.
pub fn assess_tax_burden(input: &TaxBurdenInput) -> EngineResult<ComputationOutput<TaxBurdenOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.year < input.timeline.current_year {
        warnings.push(format!(
            "Year {} is in the past; gains use interpolated historical values",
            input.year
        ));
    }

    let mut gains_by_entity = Vec::with_capacity(input.assets.len() + input.businesses.len());
    let entities = input
        .assets
        .iter()
        .map(Valuable::Asset)
        .chain(input.businesses.iter().map(Valuable::Business));
    for entity in entities {
        gains_by_entity.push(EntityGain {
            name: entity.name().to_string(),
            gain: capital_gains(entity, input.year, input.timeline)?,
        });
    }

    let total_gains = total_capital_gains(
        &input.assets,
        &input.businesses,
        input.year,
        input.timeline,
    )?;
    let bracket = select_bracket(&input.tax_brackets, input.province, total_gains)?.clone();
    let tax_burden = burden_at_rate(total_gains, &bracket);

    if gains_by_entity.iter().any(|g| g.gain < Decimal::ZERO) {
        warnings.push("Capital losses offset gains; total is floored at zero".into());
    }

    let effective_rate_on_gains = if total_gains > Decimal::ZERO {
        tax_burden
            .checked_div(total_gains)
            .ok_or_else(|| EngineError::DivisionByZero {
                context: "effective rate on gains".into(),
            })?
    } else {
        Decimal::ZERO
    };

    let output = TaxBurdenOutput {
        year: input.year,
        gains_by_entity,
        total_gains,
        bracket,
        tax_burden,
        effective_rate_on_gains,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Capital gains tax burden: marginal rate of the bracket selected by \
         total gains, 50% inclusion up to 250,000 and 67% above",
        &serde_json::json!({
            "province": input.province.code(),
            "year": input.year,
            "current_year": input.timeline.current_year,
            "num_assets": input.assets.len(),
            "num_businesses": input.businesses.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
