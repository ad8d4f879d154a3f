use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::entities::{Business, StakeholderShare, Valuable};
use crate::error::EngineError;
use crate::series::YearPoint;
use crate::types::{percent_to_fraction, Money, Percent, Timeline};
use crate::valuation::projection::compound;
use crate::valuation::{effective_term, horizon_year, value_at_year};
use crate::EngineResult;

/// Business series run at most this many years past the current year.
pub const BUSINESS_SERIES_YEARS: Decimal = dec!(10);

/// Compounding stops after this many years; later growth is treated as
/// already reflected in the valuation.
pub const GROWTH_CAP_YEARS: Decimal = dec!(5);

/// Per-business projection bounds shared by the EBITDA and share-value
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BusinessWindow {
    horizon: i32,
    growth_cap: u32,
}

impl BusinessWindow {
    fn for_business(business: &Business, timeline: Timeline) -> EngineResult<Self> {
        let term = effective_term(business.term, timeline.life_expectancy)?;
        let horizon = horizon_year(timeline.current_year, term.min(BUSINESS_SERIES_YEARS))?;
        let growth_cap = term
            .min(GROWTH_CAP_YEARS)
            .floor()
            .to_u32()
            .ok_or_else(|| EngineError::NumericOverflow {
                context: format!("growth cap of '{}'", business.name),
            })?;
        Ok(BusinessWindow { horizon, growth_cap })
    }

    /// Years of growth applied in `year`; zero at or before the current year.
    fn exponent(&self, year: i32, current_year: i32) -> u32 {
        if year <= current_year {
            0
        } else {
            year.abs_diff(current_year).min(self.growth_cap)
        }
    }
}

fn series_key(business: &Business, stakeholder: &StakeholderShare) -> String {
    format!("{} / {}", business.name, stakeholder.name)
}

fn stake(value: Money, pct: Percent) -> Money {
    value * percent_to_fraction(pct)
}

/// Each key person's share of EBITDA, from acquisition to each business's
/// horizon (at most 10 years out). Past years carry the recorded EBITDA;
/// growth compounds for no more than `min(5, term)` years.
pub fn ebitda_contribution_series(
    businesses: &[Business],
    timeline: Timeline,
) -> EngineResult<Vec<YearPoint>> {
    let windows = business_windows(businesses, |b| !b.key_people.is_empty(), timeline)?;
    let Some(start) = windows.iter().map(|(b, _)| b.acquired_year).min() else {
        return Ok(Vec::new());
    };
    let end = windows
        .iter()
        .map(|(_, w)| w.horizon)
        .max()
        .unwrap_or(timeline.current_year);

    let mut series = Vec::new();
    for year in start..=end {
        let mut values = BTreeMap::new();
        for (business, window) in &windows {
            if year < business.acquired_year || year > window.horizon {
                continue;
            }
            let exponent = window.exponent(year, timeline.current_year);
            let ebitda = compound(business.ebitda, business.appreciation_rate, exponent)?;
            for person in &business.key_people {
                values.insert(series_key(business, person), stake(ebitda, person.percentage));
            }
        }
        series.push(YearPoint { year, values });
    }
    Ok(series)
}

/// Each shareholder's stake in the business's value, from acquisition to the
/// business's horizon. Recorded and interpolated values apply up to the
/// current year; afterwards growth compounds for at most `min(5, term)`
/// years.
pub fn share_value_series(
    businesses: &[Business],
    timeline: Timeline,
) -> EngineResult<Vec<YearPoint>> {
    let windows = business_windows(businesses, |b| !b.shareholders.is_empty(), timeline)?;
    let Some(start) = windows.iter().map(|(b, _)| b.acquired_year).min() else {
        return Ok(Vec::new());
    };
    let end = windows
        .iter()
        .map(|(_, w)| w.horizon)
        .max()
        .unwrap_or(timeline.current_year);

    let mut series = Vec::new();
    for year in start..=end {
        let mut values = BTreeMap::new();
        for (business, window) in &windows {
            if year < business.acquired_year || year > window.horizon {
                continue;
            }
            let value = business_value(business, window, year, timeline)?;
            for holder in &business.shareholders {
                values.insert(series_key(business, holder), stake(value, holder.percentage));
            }
        }
        series.push(YearPoint { year, values });
    }
    Ok(series)
}

fn business_value(
    business: &Business,
    window: &BusinessWindow,
    year: i32,
    timeline: Timeline,
) -> EngineResult<Money> {
    if year <= timeline.current_year {
        value_at_year(Valuable::Business(business), year, timeline)
    } else {
        compound(
            business.market_valuation,
            business.appreciation_rate,
            window.exponent(year, timeline.current_year),
        )
    }
}

fn business_windows<'a>(
    businesses: &'a [Business],
    include: impl Fn(&Business) -> bool,
    timeline: Timeline,
) -> EngineResult<Vec<(&'a Business, BusinessWindow)>> {
    businesses
        .iter()
        .filter(|b| include(*b))
        .map(|b| Ok((b, BusinessWindow::for_business(b, timeline)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeholderRole {
    KeyPerson,
    Shareholder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageLine {
    pub business: String,
    pub name: String,
    pub role: StakeholderRole,
    pub percentage: Percent,
    /// Capped-growth EBITDA contribution or share value at the horizon
    pub exposure: Money,
    pub insurance_coverage: Money,
    pub shortfall: Money,
}

/// Insurance already in place against each stakeholder's exposure at the
/// business's horizon.
pub fn stakeholder_coverage(business: &Business, timeline: Timeline) -> EngineResult<Vec<CoverageLine>> {
    let window = BusinessWindow::for_business(business, timeline)?;
    let exponent = window.exponent(window.horizon, timeline.current_year);
    let ebitda = compound(business.ebitda, business.appreciation_rate, exponent)?;
    let value = business_value(business, &window, window.horizon, timeline)?;

    let line = |person: &StakeholderShare, role: StakeholderRole, base: Money| {
        let exposure = stake(base, person.percentage);
        CoverageLine {
            business: business.name.clone(),
            name: person.name.clone(),
            role,
            percentage: person.percentage,
            exposure,
            insurance_coverage: person.insurance_coverage,
            shortfall: (exposure - person.insurance_coverage).max(Decimal::ZERO),
        }
    };

    Ok(business
        .key_people
        .iter()
        .map(|p| line(p, StakeholderRole::KeyPerson, ebitda))
        .chain(
            business
                .shareholders
                .iter()
                .map(|s| line(s, StakeholderRole::Shareholder, value)),
        )
        .collect())
}
