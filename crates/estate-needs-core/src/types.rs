use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0–100 scale (6 = 6%). Growth rates,
/// allocations and tax rates all use this convention.
pub type Percent = Decimal;

/// Year counts, possibly fractional (asset terms)
pub type Years = Decimal;

/// The point in time a projection is anchored to.
///
/// `current_year` is the calendar year treated as "now"; the engine never
/// reads the system clock. `life_expectancy` drives the default term of any
/// asset or business without a declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub current_year: i32,
    pub life_expectancy: i32,
}

impl Timeline {
    pub fn new(current_year: i32, life_expectancy: i32) -> Self {
        Timeline {
            current_year,
            life_expectancy,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert a percentage (0–100) into a fraction (0–1).
pub fn percent_to_fraction(pct: Percent) -> Decimal {
    pct / Decimal::ONE_HUNDRED
}
