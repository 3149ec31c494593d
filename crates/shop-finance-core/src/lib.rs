pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "depreciation")]
pub mod assets;

#[cfg(feature = "ratios")]
pub mod ratios;

#[cfg(feature = "forecast")]
pub mod forecast;

pub use config::EngineConfig;
pub use error::ShopFinanceError;
pub use types::*;

/// Standard result type for all shop-finance operations
pub type ShopFinanceResult<T> = Result<T, ShopFinanceError>;
