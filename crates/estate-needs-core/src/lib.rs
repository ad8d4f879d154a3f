pub mod entities;
pub mod error;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "distribution")]
pub mod distribution;

#[cfg(feature = "needs")]
pub mod needs;

#[cfg(feature = "series")]
pub mod series;

pub use entities::*;
pub use error::EngineError;
pub use types::*;

/// Standard result type for all engine operations
pub type EngineResult<T> = Result<T, EngineError>;
