//! Client-side snapshots consumed by every engine component.
//!
//! These are plain values produced by the persistence layer. Nothing in the
//! engine mutates them; each calculation borrows what it needs.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::EngineResult;
use crate::types::{Money, Percent, Timeline, Years};

// ---------------------------------------------------------------------------
// Province
// ---------------------------------------------------------------------------

/// Canadian province or territory, keyed by its two-letter postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Province {
    AB,
    BC,
    MB,
    NB,
    NL,
    NS,
    NT,
    NU,
    ON,
    PE,
    QC,
    SK,
    YT,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Province::AB,
        Province::BC,
        Province::MB,
        Province::NB,
        Province::NL,
        Province::NS,
        Province::NT,
        Province::NU,
        Province::ON,
        Province::PE,
        Province::QC,
        Province::SK,
        Province::YT,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Province::AB => "AB",
            Province::BC => "BC",
            Province::MB => "MB",
            Province::NB => "NB",
            Province::NL => "NL",
            Province::NS => "NS",
            Province::NT => "NT",
            Province::NU => "NU",
            Province::ON => "ON",
            Province::PE => "PE",
            Province::QC => "QC",
            Province::SK => "SK",
            Province::YT => "YT",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Province {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Province::ALL
            .iter()
            .copied()
            .find(|p| p.code() == code)
            .ok_or_else(|| EngineError::invalid("province", format!("Unknown province code '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Assets and businesses
// ---------------------------------------------------------------------------

fn default_asset_type() -> String {
    "Other".to_string()
}

/// Share of one specific asset assigned to a beneficiary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBeneficiaryLink {
    /// Beneficiary name (join key into the client's beneficiary list)
    pub beneficiary: String,
    /// Percentage of this asset; normalized by the per-asset sum.
    pub allocation: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    /// Category label used to group the diversification series
    #[serde(default = "default_asset_type")]
    pub asset_type: String,
    pub acquired_year: i32,
    pub initial_value: Money,
    pub current_value: Money,
    /// Annual growth, percent
    pub growth_rate: Percent,
    #[serde(default)]
    pub term: Option<Years>,
    pub is_taxable: bool,
    pub is_liquid: bool,
    #[serde(default)]
    pub beneficiaries: Vec<AssetBeneficiaryLink>,
}

/// A named stake in a business: a key person's share of EBITDA or a
/// shareholder's share of equity. Both carry the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderShare {
    pub name: String,
    #[serde(alias = "share_percentage", alias = "ebitda_contribution_percentage")]
    pub percentage: Percent,
    #[serde(default)]
    pub insurance_coverage: Money,
}

pub type KeyPerson = StakeholderShare;
pub type Shareholder = StakeholderShare;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub acquired_year: i32,
    pub purchase_price: Money,
    pub market_valuation: Money,
    /// Annual appreciation, percent
    pub appreciation_rate: Percent,
    #[serde(default)]
    pub term: Option<Years>,
    #[serde(default)]
    pub ebitda: Money,
    #[serde(default)]
    pub key_people: Vec<KeyPerson>,
    #[serde(default)]
    pub shareholders: Vec<Shareholder>,
}

/// The common value-over-time shape shared by assets and businesses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationProfile {
    pub acquired_year: i32,
    pub initial_value: Money,
    pub current_value: Money,
    pub rate: Percent,
    pub term: Option<Years>,
}

/// Anything the valuation engine can project through time.
#[derive(Debug, Clone, Copy)]
pub enum Valuable<'a> {
    Asset(&'a Asset),
    Business(&'a Business),
}

impl<'a> Valuable<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Valuable::Asset(a) => &a.name,
            Valuable::Business(b) => &b.name,
        }
    }

    pub fn profile(&self) -> ValuationProfile {
        match self {
            Valuable::Asset(a) => ValuationProfile {
                acquired_year: a.acquired_year,
                initial_value: a.initial_value,
                current_value: a.current_value,
                rate: a.growth_rate,
                term: a.term,
            },
            Valuable::Business(b) => ValuationProfile {
                acquired_year: b.acquired_year,
                initial_value: b.purchase_price,
                current_value: b.market_valuation,
                rate: b.appreciation_rate,
                term: b.term,
            },
        }
    }

    /// Businesses are always taxable.
    pub fn is_taxable(&self) -> bool {
        match self {
            Valuable::Asset(a) => a.is_taxable,
            Valuable::Business(_) => true,
        }
    }
}

impl<'a> From<&'a Asset> for Valuable<'a> {
    fn from(a: &'a Asset) -> Self {
        Valuable::Asset(a)
    }
}

impl<'a> From<&'a Business> for Valuable<'a> {
    fn from(b: &'a Business) -> Self {
        Valuable::Business(b)
    }
}

/// Owned form of [`Valuable`] for JSON callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuableRecord {
    Asset(Asset),
    Business(Business),
}

impl ValuableRecord {
    pub fn as_valuable(&self) -> Valuable<'_> {
        match self {
            ValuableRecord::Asset(a) => Valuable::Asset(a),
            ValuableRecord::Business(b) => Valuable::Business(b),
        }
    }
}

// ---------------------------------------------------------------------------
// People, liabilities, goals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    /// Desired share of the estate, percent
    pub ideal_allocation: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub current_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub age: u32,
    pub annual_income: Money,
    pub province: Province,
    pub tax_freeze_at_year: i32,
    /// Age at expected death
    pub life_expectancy: i32,
    #[serde(default)]
    pub liquidity_allocated_towards_goals: Money,
}

impl Client {
    /// Calendar year the client reaches their life expectancy, never earlier
    /// than `current_year`.
    pub fn life_expectancy_year(&self, current_year: i32) -> EngineResult<i32> {
        let overflow = || EngineError::NumericOverflow {
            context: "life expectancy year".into(),
        };
        let age = i32::try_from(self.age).map_err(|_| overflow())?;
        let remaining = self.life_expectancy.checked_sub(age).ok_or_else(overflow)?.max(0);
        current_year.checked_add(remaining).ok_or_else(overflow)
    }

    pub fn timeline(&self, current_year: i32) -> Timeline {
        Timeline::new(current_year, self.life_expectancy)
    }
}

/// Sum of debts' current balances.
pub fn total_debt(debts: &[Debt]) -> Money {
    debts.iter().map(|d| d.current_value).sum()
}

/// Sum of goal amounts.
pub fn total_goal_amount(goals: &[Goal]) -> Money {
    goals.iter().map(|g| g.amount).sum::<Decimal>()
}
