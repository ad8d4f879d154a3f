use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::distribution::{
    additional_money_required, beneficiary_distributions, equalization_target,
    ideal_distributions, total_additional_money_required,
};
use crate::entities::{
    total_debt, total_goal_amount, Asset, Beneficiary, Business, Client, Debt, Goal,
};
use crate::needs::income::insured_income_amount;
use crate::needs::priorities::{want, InsurableNeedItem, InsurablePurpose};
use crate::tax::{capital_gains_tax_burden, total_capital_gains, TaxBracketTable};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Timeline};
use crate::valuation::{total_liquid_value, total_net_worth};
use crate::EngineResult;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a need calculation may read, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct NeedContext<'a> {
    pub current_year: i32,
    pub client: &'a Client,
    pub assets: &'a [Asset],
    pub businesses: &'a [Business],
    pub beneficiaries: &'a [Beneficiary],
    pub debts: &'a [Debt],
    pub goals: &'a [Goal],
    pub tax_brackets: &'a TaxBracketTable,
}

impl<'a> NeedContext<'a> {
    pub fn timeline(&self) -> Timeline {
        self.client.timeline(self.current_year)
    }

    pub fn life_expectancy_year(&self) -> EngineResult<i32> {
        self.client.life_expectancy_year(self.current_year)
    }

    fn capital_gains_at_freeze(&self) -> EngineResult<Money> {
        total_capital_gains(
            self.assets,
            self.businesses,
            self.client.tax_freeze_at_year,
            self.timeline(),
        )
    }

    fn actual_distributions(&self) -> EngineResult<BTreeMap<String, Money>> {
        beneficiary_distributions(
            self.assets,
            self.client.tax_freeze_at_year,
            self.timeline(),
            self.life_expectancy_year()?,
        )
    }
}

/// Full dollar need for one insurable purpose.
pub fn need_for(purpose: InsurablePurpose, ctx: &NeedContext<'_>) -> EngineResult<Money> {
    match purpose {
        InsurablePurpose::IncomeReplacement => {
            Ok(insured_income_amount(ctx.client.annual_income, ctx.client.age))
        }
        InsurablePurpose::TaxBurden => {
            let gains = ctx.capital_gains_at_freeze()?;
            capital_gains_tax_burden(gains, ctx.client.province, ctx.tax_brackets)
        }
        InsurablePurpose::Equalization => {
            let ideal = ideal_distributions(ctx.beneficiaries)?;
            let actual = ctx.actual_distributions()?;
            let required = additional_money_required(&ideal, &actual, total_liquid_value(ctx.assets))?;
            Ok(total_additional_money_required(&required))
        }
        InsurablePurpose::DebtCurrentLiability => Ok(total_debt(ctx.debts)),
        InsurablePurpose::GoalShortfall => Ok(goal_shortfall(ctx.client, ctx.goals)),
    }
}

/// Gap between liquidity set aside for goals and the goals themselves, as a
/// magnitude.
pub fn goal_shortfall(client: &Client, goals: &[Goal]) -> Money {
    (client.liquidity_allocated_towards_goals - total_goal_amount(goals)).abs()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeedsReportInput {
    pub current_year: i32,
    pub client: Client,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub businesses: Vec<Business>,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub insurable_needs: Vec<InsurableNeedItem>,
    pub tax_brackets: TaxBracketTable,
}

impl NeedsReportInput {
    pub fn context(&self) -> NeedContext<'_> {
        NeedContext {
            current_year: self.current_year,
            client: &self.client,
            assets: &self.assets,
            businesses: &self.businesses,
            beneficiaries: &self.beneficiaries,
            debts: &self.debts,
            goals: &self.goals,
            tax_brackets: &self.tax_brackets,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeedLine {
    pub purpose: InsurablePurpose,
    pub priority: i32,
    pub need: Money,
    pub want: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateFigures {
    pub total_net_worth: Money,
    pub total_liquid_value: Money,
    pub life_expectancy_year: i32,
    pub capital_gains_at_freeze: Money,
    pub tax_burden_at_freeze: Money,
    pub actual_distributions: BTreeMap<String, Money>,
    pub ideal_distributions: BTreeMap<String, Percent>,
    pub equalization_target: Money,
    pub additional_money_required: BTreeMap<String, Money>,
    pub total_debt: Money,
    pub total_goals: Money,
    pub goal_shortfall: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeedsReport {
    pub lines: Vec<NeedLine>,
    pub total_need: Money,
    pub total_want: Money,
    pub figures: EstateFigures,
}

/// Assess every insurable need the client listed, with need and want totals
/// and the estate figures behind them.
pub fn assess_insurable_needs(
    input: &NeedsReportInput,
) -> EngineResult<ComputationOutput<NeedsReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let ctx = input.context();

    validate_report_input(input, &mut warnings);

    // ------------------------------------------------------------------
    // 1. Estate figures
    // ------------------------------------------------------------------
    let liquid = total_liquid_value(&input.assets);
    let ideal = ideal_distributions(&input.beneficiaries)?;
    let actual = ctx.actual_distributions()?;
    let target = equalization_target(&ideal, &actual, liquid)?;
    let required = additional_money_required(&ideal, &actual, liquid)?;
    let gains = ctx.capital_gains_at_freeze()?;
    let tax_burden = capital_gains_tax_burden(gains, input.client.province, &input.tax_brackets)?;

    let goals_total = total_goal_amount(&input.goals);
    if input.client.liquidity_allocated_towards_goals > goals_total {
        warnings.push(format!(
            "Liquidity allocated to goals exceeds the goal total by {}; \
             the goal shortfall reports the magnitude of the difference",
            input.client.liquidity_allocated_towards_goals - goals_total
        ));
    }

    let figures = EstateFigures {
        total_net_worth: total_net_worth(&input.assets),
        total_liquid_value: liquid,
        life_expectancy_year: ctx.life_expectancy_year()?,
        capital_gains_at_freeze: gains,
        tax_burden_at_freeze: tax_burden,
        actual_distributions: actual,
        ideal_distributions: ideal,
        equalization_target: target,
        additional_money_required: required,
        total_debt: total_debt(&input.debts),
        total_goals: goals_total,
        goal_shortfall: goal_shortfall(&input.client, &input.goals),
    };

    // ------------------------------------------------------------------
    // 2. Need and want per listed purpose
    // ------------------------------------------------------------------
    let mut lines = Vec::with_capacity(input.insurable_needs.len());
    for item in &input.insurable_needs {
        let need = need_for(item.purpose, &ctx)?;
        lines.push(NeedLine {
            purpose: item.purpose,
            priority: item.priority,
            need,
            want: want(need, item.priority)?,
        });
    }

    let total_need: Money = lines.iter().map(|l| l.need).sum();
    let total_want: Money = lines.iter().map(|l| l.want).sum();

    let output = NeedsReport {
        lines,
        total_need,
        total_want,
        figures,
    };

    for w in &warnings {
        warn!("{w}");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Insurable needs: age-banded income replacement, capital gains tax at \
         the freeze year, beneficiary equalization, current debt and goal \
         shortfall, each scaled by the client's priority",
        &serde_json::json!({
            "current_year": input.current_year,
            "province": input.client.province.code(),
            "tax_freeze_at_year": input.client.tax_freeze_at_year,
            "life_expectancy": input.client.life_expectancy,
            "num_assets": input.assets.len(),
            "num_businesses": input.businesses.len(),
            "num_beneficiaries": input.beneficiaries.len(),
            "num_needs": input.insurable_needs.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Inconsistencies that still yield a report are surfaced as warnings.
fn validate_report_input(input: &NeedsReportInput, warnings: &mut Vec<String>) {
    if !input.beneficiaries.is_empty() {
        let ideal_sum: Decimal = input.beneficiaries.iter().map(|b| b.ideal_allocation).sum();
        if ideal_sum != Decimal::ONE_HUNDRED {
            warnings.push(format!("Ideal allocations sum to {ideal_sum}%, not 100%"));
        }
    }

    let mut seen = BTreeSet::new();
    for item in &input.insurable_needs {
        if !seen.insert(item.purpose) {
            warnings.push(format!(
                "{} is listed more than once and is counted each time",
                item.purpose
            ));
        }
    }

    if input.client.tax_freeze_at_year < input.current_year {
        warnings.push(format!(
            "Tax freeze year {} is before the current year {}",
            input.client.tax_freeze_at_year, input.current_year
        ));
    }

    if input.insurable_needs.is_empty() {
        warnings.push("No insurable needs listed; totals are zero".into());
    }
}
