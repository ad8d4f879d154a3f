pub mod net_worth;
pub mod projection;

pub use net_worth::{total_liquid_value, total_net_worth};
pub use projection::{effective_term, horizon_year, value_at_year};
