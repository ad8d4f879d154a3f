use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::entities::{Asset, Beneficiary, Valuable};
use crate::error::EngineError;
use crate::types::{Money, Percent, Timeline};
use crate::valuation::{effective_term, horizon_year, value_at_year};
use crate::EngineResult;

/// Year at which `asset` is valued for distribution.
///
/// An asset whose own term ends before the freeze year is valued at its term
/// end; otherwise it is valued at the life-expectancy year.
pub fn distribution_year(
    asset: &Asset,
    tax_freeze_year: i32,
    timeline: Timeline,
    life_expectancy_year: i32,
) -> EngineResult<i32> {
    let term = effective_term(asset.term, timeline.life_expectancy)?;
    let term_end_year = horizon_year(timeline.current_year, term)?;
    if tax_freeze_year > term_end_year {
        Ok(term_end_year)
    } else {
        Ok(life_expectancy_year)
    }
}

/// Projected dollars reaching each beneficiary, keyed by name.
///
/// Each asset's value is split across its links in proportion to
/// `allocation / sum(allocations on that asset)` and accumulated across all
/// assets.
pub fn beneficiary_distributions(
    assets: &[Asset],
    tax_freeze_year: i32,
    timeline: Timeline,
    life_expectancy_year: i32,
) -> EngineResult<BTreeMap<String, Money>> {
    let mut distributions: BTreeMap<String, Money> = BTreeMap::new();

    for asset in assets {
        let allocation_sum: Decimal = asset.beneficiaries.iter().map(|l| l.allocation).sum();
        if let Some(link) = asset.beneficiaries.iter().find(|l| l.allocation < Decimal::ZERO) {
            return Err(EngineError::invalid(
                "allocation",
                format!(
                    "'{}' allocates a negative share to '{}'",
                    asset.name, link.beneficiary
                ),
            ));
        }
        if allocation_sum.is_zero() {
            debug!("asset '{}' has no beneficiary allocations; skipped", asset.name);
            continue;
        }

        let year = distribution_year(asset, tax_freeze_year, timeline, life_expectancy_year)?;
        let value = value_at_year(Valuable::Asset(asset), year, timeline)?;

        for link in &asset.beneficiaries {
            let share = value * link.allocation / allocation_sum;
            *distributions
                .entry(link.beneficiary.clone())
                .or_insert(Decimal::ZERO) += share;
        }
    }

    Ok(distributions)
}

/// Each beneficiary's ideal share of the estate, as a percentage.
pub fn ideal_distributions(beneficiaries: &[Beneficiary]) -> EngineResult<BTreeMap<String, Percent>> {
    let mut ideal = BTreeMap::new();
    for b in beneficiaries {
        if b.ideal_allocation < Decimal::ZERO || b.ideal_allocation > Decimal::ONE_HUNDRED {
            return Err(EngineError::invalid(
                "ideal_allocation",
                format!("'{}' ideal allocation must be between 0 and 100", b.name),
            ));
        }
        if ideal.insert(b.name.clone(), b.ideal_allocation).is_some() {
            return Err(EngineError::invalid(
                "beneficiaries",
                format!("Beneficiary name '{}' appears more than once", b.name),
            ));
        }
    }
    Ok(ideal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AssetBeneficiaryLink;
    use rust_decimal_macros::dec;

    fn link(name: &str, allocation: Decimal) -> AssetBeneficiaryLink {
        AssetBeneficiaryLink {
            beneficiary: name.into(),
            allocation,
        }
    }

    fn asset(name: &str, value: Decimal, term: Option<Decimal>, links: Vec<AssetBeneficiaryLink>) -> Asset {
        Asset {
            name: name.into(),
            asset_type: "Real Estate".into(),
            acquired_year: 2024,
            initial_value: value,
            current_value: value,
            growth_rate: dec!(10),
            term,
            is_taxable: true,
            is_liquid: false,
            beneficiaries: links,
        }
    }

    #[test]
    fn test_distribution_year_selection() {
        let tl = Timeline::new(2024, 86);
        let short = asset("Cabin", dec!(1), Some(dec!(5)), vec![]);
        // Term ends 2029, before the 2035 freeze
        assert_eq!(distribution_year(&short, 2035, tl, 2060).unwrap(), 2029);
        // Freeze at or before term end: life-expectancy year
        assert_eq!(distribution_year(&short, 2029, tl, 2060).unwrap(), 2060);
        let open = asset("House", dec!(1), None, vec![]);
        assert_eq!(distribution_year(&open, 2035, tl, 2060).unwrap(), 2060);
    }

    #[test]
    fn test_allocations_normalized_per_asset() {
        let tl = Timeline::new(2024, 86);
        // Allocations 30/10 normalize to 75%/25%
        let a = asset(
            "Cottage",
            dec!(100_000),
            Some(dec!(1)),
            vec![link("Alice", dec!(30)), link("Bob", dec!(10))],
        );
        let d = beneficiary_distributions(&[a], 2030, tl, 2060).unwrap();
        // Valued at term end 2025: 110,000
        assert_eq!(d["Alice"], dec!(82_500));
        assert_eq!(d["Bob"], dec!(27_500));
    }

    #[test]
    fn test_distributions_accumulate_across_assets() {
        let tl = Timeline::new(2024, 86);
        let a = asset("A", dec!(100), Some(dec!(0)), vec![link("Alice", dec!(100))]);
        let b = asset(
            "B",
            dec!(200),
            Some(dec!(0)),
            vec![link("Alice", dec!(50)), link("Bob", dec!(50))],
        );
        let unlinked = asset("C", dec!(1_000), Some(dec!(0)), vec![]);
        let d = beneficiary_distributions(&[a, b, unlinked], 2030, tl, 2060).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d["Alice"], dec!(200));
        assert_eq!(d["Bob"], dec!(100));
    }

    #[test]
    fn test_ideal_distributions_rejects_duplicates() {
        let people = vec![
            Beneficiary {
                name: "Alice".into(),
                ideal_allocation: dec!(50),
            },
            Beneficiary {
                name: "Alice".into(),
                ideal_allocation: dec!(50),
            },
        ];
        assert!(ideal_distributions(&people).is_err());
        let ideal = ideal_distributions(&people[..1]).unwrap();
        assert_eq!(ideal["Alice"], dec!(50));
    }
}
