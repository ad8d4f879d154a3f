use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::types::{percent_to_fraction, Money, Percent};
use crate::EngineResult;

/// Estate-wide total the equalization must reach, net of liquidity on hand.
///
/// Every beneficiary implies an estate size `actual / ideal_share`; the
/// largest of these (the least-satisfied beneficiary) sets the target.
/// Liquid assets already on hand reduce it, never below zero.
///
/// Beneficiaries with an ideal share of zero cannot imply a total and are
/// skipped. A distribution to a name with no ideal share is an error.
pub fn equalization_target(
    ideal: &BTreeMap<String, Percent>,
    actual: &BTreeMap<String, Money>,
    total_liquid: Money,
) -> EngineResult<Money> {
    if let Some(stray) = actual.keys().find(|name| !ideal.contains_key(*name)) {
        return Err(EngineError::invalid(
            "actual",
            format!("Distribution to '{stray}' who is not a listed beneficiary"),
        ));
    }

    let mut total_needed = Decimal::ZERO;
    for (name, share) in ideal {
        if *share < Decimal::ZERO {
            return Err(EngineError::invalid(
                "ideal",
                format!("'{name}' has a negative ideal share"),
            ));
        }
        if share.is_zero() {
            debug!("'{name}' has a zero ideal share; excluded from the target");
            continue;
        }
        let received = actual.get(name).copied().unwrap_or(Decimal::ZERO);
        let implied_total = received / percent_to_fraction(*share);
        total_needed = total_needed.max(implied_total);
    }

    Ok((total_needed - total_liquid).max(Decimal::ZERO))
}

/// Additional money each beneficiary needs for real distributions to match
/// their ideal shares of the equalization target.
pub fn additional_money_required(
    ideal: &BTreeMap<String, Percent>,
    actual: &BTreeMap<String, Money>,
    total_liquid: Money,
) -> EngineResult<BTreeMap<String, Money>> {
    let target = equalization_target(ideal, actual, total_liquid)?;

    Ok(ideal
        .iter()
        .map(|(name, share)| {
            let received = actual.get(name).copied().unwrap_or(Decimal::ZERO);
            let required = (target * percent_to_fraction(*share) - received).max(Decimal::ZERO);
            (name.clone(), required)
        })
        .collect())
}

pub fn total_additional_money_required(required: &BTreeMap<String, Money>) -> Money {
    required.values().copied().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn map(entries: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_least_satisfied_beneficiary_sets_target() {
        let ideal = map(&[("Alice", dec!(50)), ("Bob", dec!(50))]);
        let actual = map(&[("Alice", dec!(300_000)), ("Bob", dec!(100_000))]);
        assert_eq!(equalization_target(&ideal, &actual, Decimal::ZERO).unwrap(), dec!(600_000));

        let required = additional_money_required(&ideal, &actual, Decimal::ZERO).unwrap();
        assert_eq!(required["Alice"], Decimal::ZERO);
        assert_eq!(required["Bob"], dec!(200_000));
        assert_eq!(total_additional_money_required(&required), dec!(200_000));
    }

    #[test]
    fn test_liquidity_offsets_target() {
        let ideal = map(&[("Alice", dec!(60)), ("Bob", dec!(40))]);
        let actual = map(&[("Alice", dec!(600_000))]);
        // Implied total 1,000,000 less 250,000 liquid
        let required = additional_money_required(&ideal, &actual, dec!(250_000)).unwrap();
        assert_eq!(required["Alice"], Decimal::ZERO);
        assert_eq!(required["Bob"], dec!(300_000));
    }

    #[test]
    fn test_liquidity_exceeding_target_needs_nothing() {
        let ideal = map(&[("Alice", dec!(50)), ("Bob", dec!(50))]);
        let actual = map(&[("Alice", dec!(10_000))]);
        let required = additional_money_required(&ideal, &actual, dec!(1_000_000)).unwrap();
        assert_eq!(total_additional_money_required(&required), Decimal::ZERO);
    }

    #[test]
    fn test_no_distributions_needs_nothing() {
        let ideal = map(&[("Alice", dec!(25)), ("Bob", dec!(75))]);
        let required = additional_money_required(&ideal, &BTreeMap::new(), dec!(5_000)).unwrap();
        assert_eq!(required.len(), 2);
        assert_eq!(total_additional_money_required(&required), Decimal::ZERO);
    }

    #[test]
    fn test_zero_share_beneficiary_excluded_from_target() {
        let ideal = map(&[("Alice", dec!(100)), ("Charity", dec!(0))]);
        let actual = map(&[("Alice", dec!(50_000)), ("Charity", dec!(80_000))]);
        assert_eq!(equalization_target(&ideal, &actual, Decimal::ZERO).unwrap(), dec!(50_000));
    }

    #[test]
    fn test_unknown_recipient_rejected() {
        let ideal = map(&[("Alice", dec!(100))]);
        let actual = map(&[("Mallory", dec!(1))]);
        assert!(matches!(
            additional_money_required(&ideal, &actual, Decimal::ZERO),
            Err(EngineError::InvalidArgument { .. })
        ));
    }
}
