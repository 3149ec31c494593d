pub mod depreciation;
pub mod model;
pub mod register;

pub use model::{AssetStatus, DepreciationMethod, FixedAsset};
