use estate_needs_core::entities::{Asset, Business, Valuable, ValuableRecord};
use estate_needs_core::types::Timeline;
use estate_needs_core::valuation::projection::{value_entity, ValuationQuery};
use estate_needs_core::valuation::{effective_term, horizon_year, value_at_year};
use estate_needs_core::EngineError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn timeline() -> Timeline {
    Timeline::new(2024, 86)
}

fn cottage(term: Option<Decimal>) -> Asset {
    Asset {
        name: "Cottage".into(),
        asset_type: "Real Estate".into(),
        acquired_year: 2015,
        initial_value: dec!(10_000),
        current_value: dec!(20_000),
        growth_rate: dec!(6),
        term,
        is_taxable: true,
        is_liquid: false,
        beneficiaries: vec![],
    }
}

fn dental_practice() -> Business {
    Business {
        name: "Dental Practice".into(),
        acquired_year: 2012,
        purchase_price: dec!(400_000),
        market_valuation: dec!(1_100_000),
        appreciation_rate: dec!(3),
        term: Some(dec!(12)),
        ebitda: dec!(250_000),
        key_people: vec![],
        shareholders: vec![],
    }
}

// ===========================================================================
// Recorded values and window
// ===========================================================================

#[test]
fn test_cottage_ten_years_out() {
    // 20,000 * 1.06^10 = 35,816.95
    let asset = cottage(None);
    let value = value_at_year(Valuable::Asset(&asset), 2034, timeline()).unwrap();
    assert!(
        (value - dec!(35_816.95)).abs() < dec!(0.01),
        "Expected ~35,816.95, got {value}"
    );
}

#[test]
fn test_recorded_values_are_returned_exactly() {
    let asset = cottage(Some(dec!(5)));
    let business = dental_practice();
    for life_expectancy in [60, 86, 110] {
        let tl = Timeline::new(2024, life_expectancy);
        for entity in [Valuable::Asset(&asset), Valuable::Business(&business)] {
            let p = entity.profile();
            assert_eq!(value_at_year(entity, p.acquired_year, tl).unwrap(), p.initial_value);
            assert_eq!(value_at_year(entity, 2024, tl).unwrap(), p.current_value);
        }
    }
}

#[test]
fn test_zero_outside_holding_window() {
    let asset = cottage(Some(dec!(3)));
    let entity = Valuable::Asset(&asset);
    assert_eq!(value_at_year(entity, 2014, timeline()).unwrap(), Decimal::ZERO);
    assert!(value_at_year(entity, 2027, timeline()).unwrap() > Decimal::ZERO);
    assert_eq!(value_at_year(entity, 2028, timeline()).unwrap(), Decimal::ZERO);
}

#[test]
fn test_acquired_this_year_uses_recorded_value() {
    let mut asset = cottage(None);
    asset.acquired_year = 2024;
    asset.initial_value = dec!(20_000);
    let value = value_at_year(Valuable::Asset(&asset), 2024, timeline()).unwrap();
    assert_eq!(value, dec!(20_000));
}

#[test]
fn test_future_values_strictly_increase_with_positive_rate() {
    let business = dental_practice();
    let entity = Valuable::Business(&business);
    let values: Vec<Decimal> = (2024..=2036)
        .map(|y| value_at_year(entity, y, timeline()).unwrap())
        .collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
}

#[test]
fn test_past_values_follow_implied_growth_not_stated_rate() {
    // Doubled over 2015-2024: 2019 is 10,000 * 2^(4/9), not 10,000 * 1.06^4
    let asset = cottage(None);
    let v2019 = value_at_year(Valuable::Asset(&asset), 2019, timeline()).unwrap();
    let stated = dec!(10_000) * dec!(1.06) * dec!(1.06) * dec!(1.06) * dec!(1.06);
    assert!(v2019 > dec!(10_000) && v2019 < dec!(20_000));
    assert!((v2019 - stated).abs() > dec!(100), "interpolation used the stated rate");
}

// ===========================================================================
// Term handling
// ===========================================================================

#[test]
fn test_term_cap_and_default() {
    assert_eq!(effective_term(Some(dec!(35)), 86).unwrap(), dec!(20));
    assert_eq!(effective_term(Some(dec!(7)), 86).unwrap(), dec!(7));
    assert_eq!(effective_term(None, 86).unwrap(), dec!(91));
    assert_eq!(horizon_year(2024, dec!(2.5)).unwrap(), 2026);
}

#[test]
fn test_invalid_profiles_fail_loudly() {
    let mut negative_term = cottage(Some(dec!(-1)));
    assert!(matches!(
        value_at_year(Valuable::Asset(&negative_term), 2030, timeline()),
        Err(EngineError::InvalidArgument { .. })
    ));

    negative_term.term = None;
    negative_term.initial_value = Decimal::ZERO;
    assert!(matches!(
        value_at_year(Valuable::Asset(&negative_term), 2020, timeline()),
        Err(EngineError::DivisionByZero { .. })
    ));
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_value_entity_from_tagged_json() {
    let json = r#"{
        "entity": {
            "kind": "business",
            "name": "Dental Practice",
            "acquired_year": 2012,
            "purchase_price": "400000",
            "market_valuation": "1100000",
            "appreciation_rate": "3",
            "term": "12"
        },
        "year": 2026,
        "timeline": { "current_year": 2024, "life_expectancy": 86 }
    }"#;
    let query: ValuationQuery = serde_json::from_str(json).unwrap();
    assert!(matches!(query.entity, ValuableRecord::Business(_)));
    let out = value_entity(&query).unwrap();
    // 1,100,000 * 1.03^2
    assert_eq!(out.result.value, dec!(1_166_990));
    assert_eq!(out.result.horizon_year, 2036);
}
