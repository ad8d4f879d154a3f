use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Money;

/// Coverage recommended to replace a client's income, by age band.
///
/// Bands are evaluated from the oldest down and the first match wins. Each
/// band pairs an income multiple with a coverage floor; from 70 on, coverage
/// is a flat amount and below 16 there is none.
///
/// | Age    | Coverage                  |
/// |--------|---------------------------|
/// | 70+    | 100,000                   |
/// | 61–69  | max(250,000, 10 × income) |
/// | 51–60  | max(250,000, 15 × income) |
/// | 41–50  | max(500,000, 20 × income) |
/// | 31–40  | max(500,000, 25 × income) |
/// | 16–30  | max(500,000, 30 × income) |
pub fn insured_income_amount(annual_income: Money, age: u32) -> Money {
    let banded = |floor: Decimal, multiple: Decimal| floor.max(annual_income * multiple);
    match age {
        70.. => dec!(100_000),
        61..=69 => banded(dec!(250_000), dec!(10)),
        51..=60 => banded(dec!(250_000), dec!(15)),
        41..=50 => banded(dec!(500_000), dec!(20)),
        31..=40 => banded(dec!(500_000), dec!(25)),
        16..=30 => banded(dec!(500_000), dec!(30)),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forty_five_year_old_earning_100k() {
        assert_eq!(insured_income_amount(dec!(100_000), 45), dec!(2_000_000));
    }

    #[test]
    fn test_floors_apply_to_low_incomes() {
        assert_eq!(insured_income_amount(dec!(10_000), 25), dec!(500_000));
        assert_eq!(insured_income_amount(dec!(10_000), 35), dec!(500_000));
        assert_eq!(insured_income_amount(dec!(10_000), 55), dec!(250_000));
        assert_eq!(insured_income_amount(dec!(10_000), 65), dec!(250_000));
    }

    #[test]
    fn test_band_edges() {
        let income = dec!(100_000);
        assert_eq!(insured_income_amount(income, 16), dec!(3_000_000));
        assert_eq!(insured_income_amount(income, 30), dec!(3_000_000));
        assert_eq!(insured_income_amount(income, 31), dec!(2_500_000));
        assert_eq!(insured_income_amount(income, 40), dec!(2_500_000));
        assert_eq!(insured_income_amount(income, 50), dec!(2_000_000));
        assert_eq!(insured_income_amount(income, 51), dec!(1_500_000));
        assert_eq!(insured_income_amount(income, 60), dec!(1_500_000));
        assert_eq!(insured_income_amount(income, 61), dec!(1_000_000));
        assert_eq!(insured_income_amount(income, 69), dec!(1_000_000));
    }

    #[test]
    fn test_seventy_and_over_is_flat() {
        assert_eq!(insured_income_amount(dec!(1_000_000), 70), dec!(100_000));
        assert_eq!(insured_income_amount(Decimal::ZERO, 95), dec!(100_000));
    }

    #[test]
    fn test_minors_have_no_income_need() {
        assert_eq!(insured_income_amount(dec!(50_000), 15), Decimal::ZERO);
        assert_eq!(insured_income_amount(dec!(50_000), 0), Decimal::ZERO);
    }
}
