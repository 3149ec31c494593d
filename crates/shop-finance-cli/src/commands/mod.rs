pub mod assets;
pub mod depreciation;
pub mod forecast;
pub mod ratios;
