use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use crate::entities::Province;
use crate::error::EngineError;
use crate::types::{Money, Percent};
use crate::EngineResult;

/// One tier of a combined federal + provincial schedule. Rates are percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Money,
    pub tax_rate: Percent,
    #[serde(default)]
    pub dividend_eligible_rate: Percent,
    #[serde(default)]
    pub dividend_non_eligible_rate: Percent,
}

/// Marginal-rate schedules keyed by province.
///
/// Loaded by the caller (typically from configuration) and passed to every
/// tax calculation; the engine holds no tables of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxBracketTable {
    provinces: BTreeMap<Province, Vec<TaxBracket>>,
}

impl TaxBracketTable {
    pub fn new(provinces: BTreeMap<Province, Vec<TaxBracket>>) -> EngineResult<Self> {
        let table = TaxBracketTable { provinces };
        table.validate()?;
        Ok(table)
    }

    /// Replace one province's schedule, keeping the others.
    pub fn with_province(mut self, province: Province, brackets: Vec<TaxBracket>) -> Self {
        self.provinces.insert(province, brackets);
        self
    }

    pub fn provinces(&self) -> impl Iterator<Item = Province> + '_ {
        self.provinces.keys().copied()
    }

    /// Brackets for `province`, checked for well-formedness.
    pub fn brackets(&self, province: Province) -> EngineResult<&[TaxBracket]> {
        let brackets = self
            .provinces
            .get(&province)
            .map(Vec::as_slice)
            .unwrap_or_default();
        check_schedule(province, brackets)?;
        Ok(brackets)
    }

    /// Every schedule must start at 0 and strictly increase.
    pub fn validate(&self) -> EngineResult<()> {
        for (province, brackets) in &self.provinces {
            check_schedule(*province, brackets)?;
        }
        Ok(())
    }
}

fn check_schedule(province: Province, brackets: &[TaxBracket]) -> EngineResult<()> {
    let first = brackets.first().ok_or(EngineError::NoBracketFound {
        province,
        amount: Decimal::ZERO,
    })?;
    if !first.min_income.is_zero() {
        return Err(EngineError::NoBracketFound {
            province,
            amount: Decimal::ZERO,
        });
    }
    for pair in brackets.windows(2) {
        if pair[1].min_income <= pair[0].min_income {
            return Err(EngineError::NoBracketFound {
                province,
                amount: pair[1].min_income,
            });
        }
    }
    Ok(())
}

/// The bracket whose range contains `amount`: `min_income <= amount` and
/// `amount` below the next bracket's floor (the last bracket is open-ended).
pub fn select_bracket(
    table: &TaxBracketTable,
    province: Province,
    amount: Money,
) -> EngineResult<&TaxBracket> {
    if amount < Decimal::ZERO {
        return Err(EngineError::invalid(
            "amount",
            format!("Bracket lookup amount cannot be negative (got {amount})"),
        ));
    }

    let brackets = table.brackets(province)?;
    // Validated: brackets[0].min_income == 0 <= amount, so idx >= 1.
    let idx = brackets.partition_point(|b| b.min_income <= amount);
    brackets
        .get(idx.wrapping_sub(1))
        .ok_or(EngineError::NoBracketFound { province, amount })
}
