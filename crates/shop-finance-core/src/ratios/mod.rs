pub mod financial;
pub mod snapshot;

pub use financial::{compute_ratios, FinancialRatios, RatioFigures};
pub use snapshot::CapitalSnapshot;
