use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use shop_finance_core::assets::{depreciation, register};
use shop_finance_core::forecast::cash_flow;
use shop_finance_core::ratios::financial;
use shop_finance_core::ShopFinanceResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the JSON input, run one envelope call, serialise the envelope.
fn run_json<I, O>(input_json: &str, f: impl FnOnce(&I) -> ShopFinanceResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fixed assets
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_depreciation(input_json: String) -> NapiResult<String> {
    run_json::<depreciation::DepreciationInput, _>(&input_json, depreciation::calculate_depreciation)
}

#[napi]
pub fn summarize_register(input_json: String) -> NapiResult<String> {
    run_json::<register::AssetRegisterInput, _>(&input_json, register::summarize_register)
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_financial_ratios(input_json: String) -> NapiResult<String> {
    run_json::<financial::RatioInput, _>(&input_json, financial::calculate_financial_ratios)
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[napi]
pub fn forecast_cash_flow(input_json: String) -> NapiResult<String> {
    run_json::<cash_flow::ForecastInput, _>(&input_json, cash_flow::forecast_cash_flow)
}
