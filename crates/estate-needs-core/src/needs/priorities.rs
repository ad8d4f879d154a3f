use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::Money;
use crate::EngineResult;

/// What an insurance need covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsurablePurpose {
    IncomeReplacement,
    TaxBurden,
    Equalization,
    DebtCurrentLiability,
    GoalShortfall,
}

impl fmt::Display for InsurablePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsurablePurpose::IncomeReplacement => "Income Replacement",
            InsurablePurpose::TaxBurden => "Tax Burden",
            InsurablePurpose::Equalization => "Equalization",
            InsurablePurpose::DebtCurrentLiability => "Debt (Current Liability)",
            InsurablePurpose::GoalShortfall => "Goal Shortfall",
        };
        f.write_str(label)
    }
}

/// A purpose the client wants insured, and how much they care about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurableNeedItem {
    pub purpose: InsurablePurpose,
    /// 0–100
    pub priority: i32,
}

/// The portion of `need` the client wants funded at `priority` percent.
pub fn want(need: Money, priority: i32) -> EngineResult<Money> {
    if need < Decimal::ZERO {
        return Err(EngineError::invalid(
            "need",
            format!("Need cannot be negative (got {need})"),
        ));
    }
    if !(0..=100).contains(&priority) {
        return Err(EngineError::invalid(
            "priority",
            format!("Priority must be between 0 and 100 (got {priority})"),
        ));
    }
    Ok(need * Decimal::from(priority) / Decimal::ONE_HUNDRED)
}
