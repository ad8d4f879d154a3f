use estate_needs_core::entities::{Asset, Province};
use estate_needs_core::tax::capital_gains::{assess_tax_burden, TaxBurdenInput};
use estate_needs_core::tax::{capital_gains_tax_burden, select_bracket, TaxBracketTable};
use estate_needs_core::types::Timeline;
use estate_needs_core::EngineError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fixture_table() -> TaxBracketTable {
    let table: TaxBracketTable =
        serde_json::from_str(include_str!("fixtures/tax_brackets.json")).unwrap();
    table.validate().unwrap();
    table
}

// ===========================================================================
// Bracket lookup
// ===========================================================================

#[test]
fn test_each_bracket_selects_itself_at_its_floor() {
    let table = fixture_table();
    for province in table.provinces().collect::<Vec<_>>() {
        for bracket in table.brackets(province).unwrap() {
            let selected = select_bracket(&table, province, bracket.min_income).unwrap();
            assert_eq!(selected.min_income, bracket.min_income);
            assert_eq!(selected.tax_rate, bracket.tax_rate);
        }
    }
}

#[test]
fn test_amount_just_below_floor_selects_previous_bracket() {
    let table = fixture_table();
    let selected = select_bracket(&table, Province::AB, dec!(246_751.99)).unwrap();
    assert_eq!(selected.tax_rate, dec!(43.00));
}

#[test]
fn test_negative_amount_is_invalid_argument() {
    let table = fixture_table();
    assert!(matches!(
        select_bracket(&table, Province::ON, dec!(-1)),
        Err(EngineError::InvalidArgument { .. })
    ));
}

#[test]
fn test_province_missing_from_table() {
    let table = fixture_table();
    assert!(matches!(
        select_bracket(&table, Province::NU, dec!(10_000)),
        Err(EngineError::NoBracketFound { .. })
    ));
}

// ===========================================================================
// Capital gains tax burden
// ===========================================================================

#[test]
fn test_alberta_burden_on_300k() {
    let table = fixture_table();
    // 300,000 falls in the 246,752 bracket at 47%
    let r = dec!(0.47);
    let expected = dec!(250_000) * dec!(0.5) * r + dec!(50_000) * dec!(0.67) * r;
    let burden = capital_gains_tax_burden(dec!(300_000), Province::AB, &table).unwrap();
    assert_eq!(burden, expected);
    assert_eq!(burden, dec!(74_495));
}

#[test]
fn test_zero_gains_zero_burden_everywhere() {
    let table = fixture_table();
    for province in [Province::AB, Province::ON] {
        assert_eq!(
            capital_gains_tax_burden(Decimal::ZERO, province, &table).unwrap(),
            Decimal::ZERO
        );
    }
}

#[test]
fn test_no_jump_at_inclusion_threshold() {
    let table = fixture_table();
    let at = capital_gains_tax_burden(dec!(250_000), Province::AB, &table).unwrap();
    let above = capital_gains_tax_burden(dec!(250_000.01), Province::AB, &table).unwrap();
    assert_eq!(at, dec!(58_750));
    assert!(above > at && above - at < dec!(0.01), "jump of {}", above - at);
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_assess_tax_burden_floors_losses() {
    let gain = Asset {
        name: "Rental".into(),
        asset_type: "Real Estate".into(),
        acquired_year: 2010,
        initial_value: dec!(300_000),
        current_value: dec!(500_000),
        growth_rate: dec!(0),
        term: None,
        is_taxable: true,
        is_liquid: false,
        beneficiaries: vec![],
    };
    let loss = Asset {
        name: "Tech Stocks".into(),
        asset_type: "Investments".into(),
        initial_value: dec!(100_000),
        current_value: dec!(40_000),
        ..gain.clone()
    };
    let input = TaxBurdenInput {
        province: Province::ON,
        year: 2024,
        timeline: Timeline::new(2024, 86),
        assets: vec![gain, loss],
        businesses: vec![],
        tax_brackets: fixture_table(),
    };
    let out = assess_tax_burden(&input).unwrap();
    assert_eq!(out.result.total_gains, dec!(140_000));
    // 140,000 is in Ontario's 111,733 bracket at 37.91%
    assert_eq!(out.result.bracket.tax_rate, dec!(37.91));
    assert_eq!(out.result.tax_burden, dec!(26_537));
    assert!(out.warnings.iter().any(|w| w.contains("losses")));
}
