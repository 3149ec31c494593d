use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use shop_finance_core::forecast::cash_flow::{self, ForecastInput};
use shop_finance_core::EngineConfig;

use crate::input;

/// Arguments for the cash-flow forecast
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON input file ({"history": [...], "horizon_months": N, "start_date": ...})
    #[arg(long)]
    pub input: Option<String>,

    /// Months to project (overrides the input file)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Forecast anchor date, YYYY-MM-DD (overrides the input file)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_forecast(
    args: ForecastArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut forecast_input: ForecastInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file (or piped JSON) is required for the forecast".into());
    };

    if let Some(horizon) = args.horizon {
        forecast_input.horizon_months = horizon;
    }
    if let Some(start_date) = args.start_date {
        forecast_input.start_date = start_date;
    }
    if let Some(config) = config {
        forecast_input.settings = config.forecast.clone();
    }

    let result = cash_flow::forecast_cash_flow(&forecast_input)?;
    Ok(serde_json::to_value(result)?)
}
