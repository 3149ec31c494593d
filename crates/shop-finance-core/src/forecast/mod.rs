pub mod cash_flow;
pub mod patterns;

pub use cash_flow::{forecast, forecast_with_settings, CashFlowForecast, ConfidenceTier};
pub use patterns::{extract_patterns, CashFlowPattern};
