use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{Asset, Business, Province, Valuable};
use crate::error::EngineError;
use crate::series::YearPoint;
use crate::tax::{capital_gains, capital_gains_tax_burden, total_capital_gains, TaxBracketTable};
use crate::types::{Money, Timeline};
use crate::valuation::{effective_term, horizon_year, value_at_year};
use crate::EngineResult;

/// Category under which businesses appear in the diversification series.
pub const BUSINESS_CATEGORY: &str = "Business";

fn valuables<'a>(assets: &'a [Asset], businesses: &'a [Business]) -> Vec<Valuable<'a>> {
    assets
        .iter()
        .map(Valuable::Asset)
        .chain(businesses.iter().map(Valuable::Business))
        .collect()
}

/// Keys a [`YearPoint`] record already carries beside its flattened values.
const YEAR_POINT_FIELDS: [&str; 1] = ["year"];

/// Keys a [`TaxBurdenPoint`] record already carries beside `by_entity`.
const TAX_BURDEN_POINT_FIELDS: [&str; 3] = ["year", "total_gains", "tax_burden"];

/// Series keys must be unique per entity and must not shadow a record field.
fn check_entity_names(entities: &[Valuable<'_>], reserved: &[&str]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for entity in entities {
        let name = entity.name();
        if reserved.contains(&name) {
            return Err(EngineError::invalid(
                "name",
                format!("'{name}' is reserved in series records"),
            ));
        }
        if !seen.insert(name) {
            return Err(EngineError::invalid(
                "name",
                format!("Asset or business name '{name}' appears more than once"),
            ));
        }
    }
    Ok(())
}

/// Years from the earliest acquisition through `end_year`, or `None` when
/// there is nothing to chart.
fn year_range(entities: &[Valuable<'_>], end_year: i32) -> Option<std::ops::RangeInclusive<i32>> {
    let start = entities.iter().map(|e| e.profile().acquired_year).min()?;
    Some(start..=end_year.max(start))
}

fn in_window(entity: Valuable<'_>, year: i32, timeline: Timeline) -> EngineResult<bool> {
    let profile = entity.profile();
    let term = effective_term(profile.term, timeline.life_expectancy)?;
    Ok(year >= profile.acquired_year && year <= horizon_year(timeline.current_year, term)?)
}

/// Value of every asset and business by name, each year through
/// `end_year`. Every record carries every key; out-of-window entities are 0.
pub fn net_worth_series(
    assets: &[Asset],
    businesses: &[Business],
    end_year: i32,
    timeline: Timeline,
) -> EngineResult<Vec<YearPoint>> {
    let entities = valuables(assets, businesses);
    check_entity_names(&entities, &YEAR_POINT_FIELDS)?;
    let Some(years) = year_range(&entities, end_year) else {
        return Ok(Vec::new());
    };

    let mut series = Vec::with_capacity(years.clone().count());
    for year in years {
        let mut values = BTreeMap::new();
        for entity in &entities {
            let value = value_at_year(*entity, year, timeline)?;
            values.insert(entity.name().to_string(), value);
        }
        series.push(YearPoint { year, values });
    }
    Ok(series)
}

/// Asset values summed by `asset_type` (businesses under "Business"), each
/// year through `end_year`. Every category appears in every record.
pub fn diversification_series(
    assets: &[Asset],
    businesses: &[Business],
    end_year: i32,
    timeline: Timeline,
) -> EngineResult<Vec<YearPoint>> {
    let entities = valuables(assets, businesses);
    let Some(years) = year_range(&entities, end_year) else {
        return Ok(Vec::new());
    };

    let category = |entity: &Valuable<'_>| match entity {
        Valuable::Asset(a) => a.asset_type.clone(),
        Valuable::Business(_) => BUSINESS_CATEGORY.to_string(),
    };
    if let Some(e) = entities.iter().find(|e| YEAR_POINT_FIELDS.contains(&category(*e).as_str())) {
        return Err(EngineError::invalid(
            "asset_type",
            format!("Category of '{}' is reserved in series records", e.name()),
        ));
    }

    let mut series = Vec::new();
    for year in years {
        let mut values: BTreeMap<String, Money> = entities
            .iter()
            .map(|e| (category(e), Decimal::ZERO))
            .collect();
        for entity in &entities {
            let value = value_at_year(*entity, year, timeline)?;
            if let Some(slot) = values.get_mut(&category(entity)) {
                *slot += value;
            }
        }
        series.push(YearPoint { year, values });
    }
    Ok(series)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBurdenPoint {
    pub year: i32,
    pub total_gains: Money,
    pub tax_burden: Money,
    /// Each in-window taxable entity's share of `tax_burden`
    #[serde(flatten)]
    pub by_entity: BTreeMap<String, Money>,
}

/// Tax that would be owed if everything were disposed of in each year.
///
/// The burden is split across entities in proportion to their positive
/// gains; entities outside their holding window are omitted.
pub fn tax_burden_series(
    assets: &[Asset],
    businesses: &[Business],
    province: Province,
    table: &TaxBracketTable,
    end_year: i32,
    timeline: Timeline,
) -> EngineResult<Vec<TaxBurdenPoint>> {
    let entities = valuables(assets, businesses);
    check_entity_names(&entities, &TAX_BURDEN_POINT_FIELDS)?;
    let Some(years) = year_range(&entities, end_year) else {
        return Ok(Vec::new());
    };

    let mut series = Vec::new();
    for year in years {
        let total_gains = total_capital_gains(assets, businesses, year, timeline)?;
        let tax_burden = capital_gains_tax_burden(total_gains, province, table)?;

        let mut gains: Vec<(&str, Money)> = Vec::new();
        for entity in &entities {
            if entity.is_taxable() && in_window(*entity, year, timeline)? {
                gains.push((entity.name(), capital_gains(*entity, year, timeline)?));
            }
        }

        let positive_total: Money = gains.iter().map(|(_, g)| (*g).max(Decimal::ZERO)).sum();
        let by_entity = gains
            .into_iter()
            .map(|(name, gain)| {
                let share = if positive_total > Decimal::ZERO {
                    tax_burden * gain.max(Decimal::ZERO) / positive_total
                } else {
                    Decimal::ZERO
                };
                (name.to_string(), share)
            })
            .collect();

        series.push(TaxBurdenPoint {
            year,
            total_gains,
            tax_burden,
            by_entity,
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::TaxBracket;
    use rust_decimal_macros::dec;

    fn tl() -> Timeline {
        Timeline::new(2024, 86)
    }

    fn asset(name: &str, kind: &str, acquired: i32, term: Option<Decimal>) -> Asset {
        Asset {
            name: name.into(),
            asset_type: kind.into(),
            acquired_year: acquired,
            initial_value: dec!(100_000),
            current_value: dec!(100_000),
            growth_rate: dec!(0),
            term,
            is_taxable: true,
            is_liquid: false,
            beneficiaries: vec![],
        }
    }

    fn flat_table() -> TaxBracketTable {
        TaxBracketTable::default().with_province(
            Province::BC,
            vec![TaxBracket {
                min_income: dec!(0),
                tax_rate: dec!(50),
                dividend_eligible_rate: dec!(0),
                dividend_non_eligible_rate: dec!(0),
            }],
        )
    }

    #[test]
    fn test_net_worth_series_backfills_zero() {
        let assets = vec![
            asset("House", "Real Estate", 2020, None),
            asset("Boat", "Vehicle", 2022, Some(dec!(2))),
        ];
        let series = net_worth_series(&assets, &[], 2030, tl()).unwrap();
        assert_eq!(series.first().unwrap().year, 2020);
        assert_eq!(series.last().unwrap().year, 2030);
        assert_eq!(series.len(), 11);
        for point in &series {
            assert_eq!(point.values.len(), 2);
        }
        assert_eq!(series[0].values["Boat"], Decimal::ZERO);
        assert_eq!(series[2].values["Boat"], dec!(100_000));
        // Boat's term ends 2026
        assert_eq!(series[6].values["Boat"], dec!(100_000));
        assert_eq!(series[7].values["Boat"], Decimal::ZERO);
    }

    #[test]
    fn test_series_sorted_ascending() {
        let assets = vec![asset("A", "Cash", 2019, None), asset("B", "Cash", 2016, None)];
        let series = net_worth_series(&assets, &[], 2026, tl()).unwrap();
        assert!(series.windows(2).all(|w| w[0].year + 1 == w[1].year));
        assert_eq!(series[0].year, 2016);
    }

    #[test]
    fn test_diversification_groups_by_type() {
        let assets = vec![
            asset("TFSA", "Investments", 2024, None),
            asset("RRSP", "Investments", 2024, None),
            asset("Condo", "Real Estate", 2024, None),
        ];
        let series = diversification_series(&assets, &[], 2025, tl()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].values["Investments"], dec!(200_000));
        assert_eq!(series[0].values["Real Estate"], dec!(100_000));
    }

    #[test]
    fn test_empty_inputs_produce_empty_series() {
        assert!(net_worth_series(&[], &[], 2060, tl()).unwrap().is_empty());
        assert!(diversification_series(&[], &[], 2060, tl()).unwrap().is_empty());
    }

    #[test]
    fn test_tax_burden_split_by_positive_gains() {
        let mut winner = asset("Shares", "Investments", 2024, Some(dec!(1)));
        winner.growth_rate = dec!(10);
        let mut flat = asset("Land", "Real Estate", 2024, Some(dec!(0)));
        flat.is_taxable = true;
        let series =
            tax_burden_series(&[winner, flat], &[], Province::BC, &flat_table(), 2025, tl()).unwrap();
        assert_eq!(series.len(), 2);
        // 2025: Shares gain 10,000; Land is past its term (value 0, gain -100,000)
        let p = &series[1];
        assert_eq!(p.total_gains, Decimal::ZERO);
        assert_eq!(p.tax_burden, Decimal::ZERO);
        assert!(p.by_entity.contains_key("Shares"));
        assert!(!p.by_entity.contains_key("Land"));
    }

    #[test]
    fn test_tax_burden_shares_sum_to_total() {
        let mut a = asset("A", "Investments", 2024, None);
        a.growth_rate = dec!(10);
        let mut b = asset("B", "Investments", 2024, None);
        b.growth_rate = dec!(20);
        let series = tax_burden_series(&[a, b], &[], Province::BC, &flat_table(), 2025, tl()).unwrap();
        let p = &series[1];
        // Gains 10,000 + 20,000 at 50% inclusion and 50% rate
        assert_eq!(p.tax_burden, dec!(7_500));
        assert_eq!(p.by_entity["A"], dec!(2_500));
        assert_eq!(p.by_entity["B"], dec!(5_000));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let assets = vec![
            asset("Cottage", "Real Estate", 2020, None),
            asset("Cottage", "Real Estate", 2021, None),
        ];
        assert!(matches!(
            net_worth_series(&assets, &[], 2030, tl()),
            Err(EngineError::InvalidArgument { .. })
        ));
        assert!(matches!(
            tax_burden_series(&assets, &[], Province::BC, &flat_table(), 2030, tl()),
            Err(EngineError::InvalidArgument { .. })
        ));
        // Shared categories are summed, not rejected
        assert_eq!(
            diversification_series(&assets, &[], 2030, tl()).unwrap()[4].values["Real Estate"],
            dec!(200_000)
        );
    }

    #[test]
    fn test_names_shadowing_record_fields_rejected() {
        let gains = vec![asset("total_gains", "Investments", 2020, None)];
        assert!(net_worth_series(&gains, &[], 2030, tl()).is_ok());
        assert!(matches!(
            tax_burden_series(&gains, &[], Province::BC, &flat_table(), 2030, tl()),
            Err(EngineError::InvalidArgument { .. })
        ));

        let year = vec![asset("year", "Investments", 2020, None)];
        assert!(net_worth_series(&year, &[], 2030, tl()).is_err());

        let category = vec![asset("Shares", "year", 2020, None)];
        assert!(diversification_series(&category, &[], 2030, tl()).is_err());
        assert!(net_worth_series(&category, &[], 2030, tl()).is_ok());
    }
}
