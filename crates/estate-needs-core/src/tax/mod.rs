pub mod brackets;
pub mod capital_gains;

pub use brackets::{select_bracket, TaxBracket, TaxBracketTable};
pub use capital_gains::{capital_gains, capital_gains_tax_burden, total_capital_gains};
