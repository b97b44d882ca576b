//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod nav;
pub mod profit;
pub mod series;

// Re-export main types for cleaner imports
pub use error::ProfitError;
pub use nav::{NavProvider, RawNavRecord};
pub use profit::{ProfitBreakdown, ProfitCalculator, ProfitRequest};
pub use series::NavSeries;
