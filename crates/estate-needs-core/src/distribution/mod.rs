pub mod beneficiaries;
pub mod equalization;

pub use beneficiaries::{beneficiary_distributions, distribution_year, ideal_distributions};
pub use equalization::{
    additional_money_required, equalization_target, total_additional_money_required,
};
