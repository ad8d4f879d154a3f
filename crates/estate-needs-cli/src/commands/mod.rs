pub mod needs;
pub mod series;
pub mod tax;
pub mod valuation;
