pub mod business;
pub mod estate;
pub mod report;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One calendar year of a chart series: `{year, <series name>: value, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    #[serde(flatten)]
    pub values: BTreeMap<String, Money>,
}

pub use business::{
    ebitda_contribution_series, share_value_series, stakeholder_coverage, CoverageLine,
    StakeholderRole,
};
pub use estate::{diversification_series, net_worth_series, tax_burden_series, TaxBurdenPoint};
pub use report::{project_series, ProjectionInput, ProjectionSeries};
