use rust_decimal::Decimal;

use crate::entities::Asset;
use crate::types::Money;

/// Sum of current values across all assets. No projection is applied.
pub fn total_net_worth(assets: &[Asset]) -> Money {
    assets.iter().map(|a| a.current_value).sum()
}

/// Sum of current values of liquid assets only.
pub fn total_liquid_value(assets: &[Asset]) -> Money {
    assets
        .iter()
        .filter(|a| a.is_liquid)
        .map(|a| a.current_value)
        .fold(Decimal::ZERO, |acc, v| acc + v)
}
