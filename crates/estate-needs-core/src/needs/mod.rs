pub mod income;
pub mod priorities;
pub mod report;

pub use income::insured_income_amount;
pub use priorities::{want, InsurableNeedItem, InsurablePurpose};
pub use report::{assess_insurable_needs, goal_shortfall, need_for, NeedContext, NeedsReportInput};
