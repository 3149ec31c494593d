use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use shop_finance_core::assets::depreciation::{self, DepreciationInput};
use shop_finance_core::assets::{DepreciationMethod, FixedAsset};

use crate::input;

/// Arguments for single-asset depreciation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DepreciationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Asset identifier
    #[arg(long, default_value = "asset")]
    pub id: String,

    /// Asset description
    #[arg(long)]
    pub name: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Salvage value at end of life
    #[arg(long, default_value = "0")]
    pub salvage_value: Decimal,

    /// Useful life in years
    #[arg(long)]
    pub useful_life: Option<i32>,

    /// straight-line, declining-balance, sum-of-years, units-of-production
    #[arg(long, default_value = "straight-line")]
    pub method: DepreciationMethod,

    /// Reporting date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Include the year-by-year schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let mut asset = FixedAsset::new(
            args.id,
            args.purchase_date
                .ok_or("--purchase-date is required (or provide --input)")?,
            args.purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            args.salvage_value,
            args.useful_life
                .ok_or("--useful-life is required (or provide --input)")?,
            args.method,
        )?;
        if let Some(name) = args.name {
            asset = asset.with_name(name);
        }
        DepreciationInput {
            asset,
            as_of_date: args.as_of.ok_or("--as-of is required (or provide --input)")?,
            include_schedule: args.schedule,
        }
    };

    let result = depreciation::calculate_depreciation(&dep_input)?;
    Ok(serde_json::to_value(result)?)
}
