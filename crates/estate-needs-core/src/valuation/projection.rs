use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::entities::{Valuable, ValuableRecord, ValuationProfile};
use crate::error::EngineError;
use crate::types::{percent_to_fraction, with_metadata, ComputationOutput, Money, Timeline, Years};
use crate::EngineResult;

/// Declared terms are capped at this many years for projection purposes.
pub const MAX_TERM_YEARS: Decimal = dec!(20);

/// Without a declared term, an entity is held this many years past the
/// client's life expectancy.
pub const DEFAULT_TERM_PADDING_YEARS: i32 = 5;

// ---------------------------------------------------------------------------
// Term handling
// ---------------------------------------------------------------------------

/// Effective holding horizon in years: `min(20, term)` when declared,
/// otherwise `life_expectancy + 5`.
pub fn effective_term(term: Option<Years>, life_expectancy: i32) -> EngineResult<Years> {
    match term {
        Some(t) if t < Decimal::ZERO => Err(EngineError::invalid(
            "term",
            format!("Term cannot be negative (got {t})"),
        )),
        Some(t) => Ok(t.min(MAX_TERM_YEARS)),
        None => life_expectancy
            .checked_add(DEFAULT_TERM_PADDING_YEARS)
            .map(Decimal::from)
            .ok_or_else(|| EngineError::NumericOverflow {
                context: "default term".into(),
            }),
    }
}

/// Last calendar year an entity still carries value: `current_year + term`,
/// rounded down for fractional terms.
pub fn horizon_year(current_year: i32, term: Years) -> EngineResult<i32> {
    (Decimal::from(current_year) + term)
        .floor()
        .to_i32()
        .ok_or_else(|| EngineError::NumericOverflow {
            context: "horizon year".into(),
        })
}

// ---------------------------------------------------------------------------
// Value at year
// ---------------------------------------------------------------------------

/// Value of an asset or business in `year`.
///
/// Recorded values are authoritative: the acquisition year returns the
/// initial value, the current year returns the current value, and years in
/// between follow the constant growth implied by those two points. Only
/// future years use the entity's declared rate. Outside the window from
/// acquisition to `current_year + effective_term` the entity is worth 0.
pub fn value_at_year(entity: Valuable<'_>, year: i32, timeline: Timeline) -> EngineResult<Money> {
    let profile = entity.profile();
    validate_profile(entity.name(), &profile, timeline)?;

    let term = effective_term(profile.term, timeline.life_expectancy)?;
    let horizon = Decimal::from(timeline.current_year) + term;
    if year < profile.acquired_year || Decimal::from(year) > horizon {
        return Ok(Decimal::ZERO);
    }

    // Branch order matters: when acquired_year == current_year the
    // interpolation denominator is zero, so both equality checks come first.
    if year == profile.acquired_year {
        return Ok(profile.initial_value);
    }
    if year == timeline.current_year {
        return Ok(profile.current_value);
    }

    if year < timeline.current_year {
        interpolate_past(entity.name(), &profile, year, timeline.current_year)
    } else {
        let years_ahead = year.abs_diff(timeline.current_year);
        compound(profile.current_value, profile.rate, years_ahead)
    }
}

/// Geometric interpolation between the acquisition and current values.
fn interpolate_past(
    name: &str,
    profile: &ValuationProfile,
    year: i32,
    current_year: i32,
) -> EngineResult<Money> {
    if profile.initial_value.is_zero() {
        return Err(EngineError::DivisionByZero {
            context: format!("implied growth of '{name}' (initial value is zero)"),
        });
    }

    let ratio = profile.current_value / profile.initial_value;
    if ratio.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let elapsed = Decimal::from(year.abs_diff(profile.acquired_year));
    let span = Decimal::from(current_year.abs_diff(profile.acquired_year));
    let factor = ratio
        .checked_powd(elapsed / span)
        .ok_or_else(|| EngineError::NumericOverflow {
            context: format!("implied growth of '{name}'"),
        })?;

    Ok(profile.initial_value * factor)
}

/// `value * (1 + rate/100)^years` by iterative multiplication (avoids
/// `powd` precision drift on integer exponents).
pub fn compound(value: Money, rate_pct: Decimal, years: u32) -> EngineResult<Money> {
    let growth_factor = Decimal::ONE + percent_to_fraction(rate_pct);
    let mut result = value;
    for _ in 0..years {
        result = result
            .checked_mul(growth_factor)
            .ok_or_else(|| EngineError::NumericOverflow {
                context: format!("compounding {value} at {rate_pct}% for {years} years"),
            })?;
    }
    Ok(result)
}

fn validate_profile(name: &str, profile: &ValuationProfile, timeline: Timeline) -> EngineResult<()> {
    if profile.acquired_year > timeline.current_year {
        return Err(EngineError::invalid(
            "acquired_year",
            format!(
                "'{name}' acquired in {} which is after the current year {}",
                profile.acquired_year, timeline.current_year
            ),
        ));
    }
    if profile.initial_value < Decimal::ZERO {
        return Err(EngineError::invalid(
            "initial_value",
            format!("'{name}' initial value cannot be negative"),
        ));
    }
    if profile.current_value < Decimal::ZERO {
        return Err(EngineError::invalid(
            "current_value",
            format!("'{name}' current value cannot be negative"),
        ));
    }
    if profile.rate < dec!(-100) {
        return Err(EngineError::invalid(
            "rate",
            format!("'{name}' growth rate cannot be below -100%"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-entity query (CLI / bindings)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationQuery {
    pub entity: ValuableRecord,
    pub year: i32,
    pub timeline: Timeline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationOutput {
    pub name: String,
    pub year: i32,
    pub value: Money,
    pub effective_term: Years,
    pub horizon_year: i32,
}

/// Value one entity at one year, wrapped in the standard envelope.
pub fn value_entity(query: &ValuationQuery) -> EngineResult<ComputationOutput<ValuationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let entity = query.entity.as_valuable();
    let profile = entity.profile();
    let term = effective_term(profile.term, query.timeline.life_expectancy)?;
    let horizon = horizon_year(query.timeline.current_year, term)?;
    let value = value_at_year(entity, query.year, query.timeline)?;

    if query.year > horizon {
        warnings.push(format!(
            "{} is past the {} horizon ({}); value is zero",
            query.year,
            entity.name(),
            horizon
        ));
    }
    if let Some(t) = profile.term {
        if t > MAX_TERM_YEARS {
            warnings.push(format!("Declared term of {t} years capped at {MAX_TERM_YEARS}"));
        }
    }

    let output = ValuationOutput {
        name: entity.name().to_string(),
        year: query.year,
        value,
        effective_term: term,
        horizon_year: horizon,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Value at year: recorded values at acquisition and today, implied \
         geometric growth in between, declared rate compounding thereafter",
        &serde_json::json!({
            "year": query.year,
            "current_year": query.timeline.current_year,
            "life_expectancy": query.timeline.life_expectancy,
            "rate": profile.rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
