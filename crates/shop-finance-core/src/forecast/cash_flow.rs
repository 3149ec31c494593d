//! Pattern-based monthly cash-flow forecast.
//!
//! Each subcategory is projected flat at `avg × (1 + growth)` for every month
//! of the horizon and weighted by its confidence. The cumulative figure is the
//! single-pass weighted net, not a month-by-month running balance.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::patterns::{extract_patterns, CashFlowPattern};
use crate::config::ForecastSettings;
use crate::types::{with_metadata, CashFlowCategory, CashFlowEntry, ComputationOutput, Money, Rate};
use crate::{ShopFinanceError, ShopFinanceResult};

/// Longest horizon the envelope accepts.
pub const MAX_HORIZON_MONTHS: u32 = 120;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLineItem {
    pub date: NaiveDate,
    pub category: CashFlowCategory,
    pub subcategory: String,
    /// Always non-negative; direction is given by the list it sits in.
    pub amount: Money,
    pub probability: Rate,
}

impl ForecastLineItem {
    pub fn expected_amount(&self) -> Money {
        self.amount * self.probability
    }
}

/// Probability-weighted totals for one projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    pub month: u32,
    pub date: NaiveDate,
    pub expected_inflow: Money,
    pub expected_outflow: Money,
    pub net: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowForecast {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub inflows: Vec<ForecastLineItem>,
    pub outflows: Vec<ForecastLineItem>,
    pub net_cash_flow: Money,
    /// Equal to `net_cash_flow`; no running balance is carried across months.
    pub cumulative_cash_flow: Money,
    pub confidence: ConfidenceTier,
    pub average_confidence: Rate,
    pub patterns: Vec<CashFlowPattern>,
    pub monthly: Vec<ForecastMonth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInput {
    pub history: Vec<CashFlowEntry>,
    pub horizon_months: u32,
    /// First day the forecast is anchored to; month `m` is dated `start + m`.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub settings: ForecastSettings,
}

// ---------------------------------------------------------------------------
// Pure engine
// ---------------------------------------------------------------------------

/// Forecast with the default settings.
pub fn forecast(
    history: &[CashFlowEntry],
    horizon_months: u32,
    start_date: NaiveDate,
) -> CashFlowForecast {
    forecast_with_settings(history, horizon_months, start_date, &ForecastSettings::default())
}

/// Forecast with explicit settings. Settings are not validated here;
/// inconsistent bounds resolve to the upper bound rather than panicking.
pub fn forecast_with_settings(
    history: &[CashFlowEntry],
    horizon_months: u32,
    start_date: NaiveDate,
    settings: &ForecastSettings,
) -> CashFlowForecast {
    let patterns = extract_patterns(history, settings);

    let mut inflows = Vec::new();
    let mut outflows = Vec::new();
    let mut monthly = Vec::with_capacity(horizon_months.min(MAX_HORIZON_MONTHS) as usize);

    for month in 1..=horizon_months {
        let date = add_months(start_date, month);
        let mut expected_inflow = Decimal::ZERO;
        let mut expected_outflow = Decimal::ZERO;

        for pattern in &patterns {
            let projected = pattern.projected_amount();
            let item = ForecastLineItem {
                date,
                category: pattern.category,
                subcategory: pattern.subcategory.clone(),
                amount: projected.abs(),
                probability: pattern.confidence,
            };
            if pattern.avg_amount > Decimal::ZERO {
                expected_inflow += item.expected_amount();
                inflows.push(item);
            } else {
                expected_outflow += item.expected_amount();
                outflows.push(item);
            }
        }

        monthly.push(ForecastMonth {
            month,
            date,
            expected_inflow,
            expected_outflow,
            net: expected_inflow - expected_outflow,
        });
    }

    let net_cash_flow = weighted_total(&inflows) - weighted_total(&outflows);
    let average_confidence = average_confidence(&patterns);

    CashFlowForecast {
        start_date,
        end_date: add_months(start_date, horizon_months),
        inflows,
        outflows,
        net_cash_flow,
        cumulative_cash_flow: net_cash_flow,
        confidence: confidence_tier(average_confidence, &patterns, settings),
        average_confidence,
        patterns,
        monthly,
    }
}

/// Tier for a mean confidence; no patterns at all is always `Low`.
fn confidence_tier(
    average: Rate,
    patterns: &[CashFlowPattern],
    settings: &ForecastSettings,
) -> ConfidenceTier {
    if patterns.is_empty() {
        ConfidenceTier::Low
    } else if average > settings.high_threshold {
        ConfidenceTier::High
    } else if average > settings.medium_threshold {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

fn average_confidence(patterns: &[CashFlowPattern]) -> Rate {
    if patterns.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = patterns.iter().map(|p| p.confidence).sum();
    total / Decimal::from(patterns.len())
}

fn weighted_total(items: &[ForecastLineItem]) -> Money {
    items.iter().map(ForecastLineItem::expected_amount).sum()
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project monthly inflows and outflows from historical cash movements.
pub fn forecast_cash_flow(
    input: &ForecastInput,
) -> ShopFinanceResult<ComputationOutput<CashFlowForecast>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.settings.validate()?;
    if input.horizon_months > MAX_HORIZON_MONTHS {
        return Err(ShopFinanceError::InvalidInput {
            field: "horizon_months".into(),
            reason: format!(
                "Horizon of {} months exceeds the {MAX_HORIZON_MONTHS}-month maximum.",
                input.horizon_months
            ),
        });
    }

    debug!(
        entries = input.history.len(),
        horizon = input.horizon_months,
        start = %input.start_date,
        "forecasting cash flow"
    );

    if input.history.is_empty() {
        warnings.push("No cash-flow history; forecast is empty.".into());
    }
    if input.horizon_months == 0 {
        warnings.push("Zero-month horizon; no line items projected.".into());
    }

    let output = forecast_with_settings(
        &input.history,
        input.horizon_months,
        input.start_date,
        &input.settings,
    );

    let thin: Vec<&str> = output
        .patterns
        .iter()
        .filter(|p| p.observations < input.settings.growth_window)
        .map(|p| p.subcategory.as_str())
        .collect();
    if !thin.is_empty() {
        warn!(subcategories = ?thin, "thin cash-flow history");
        warnings.push(format!(
            "Fewer than {} entries for: {}; growth compares overlapping windows.",
            input.settings.growth_window,
            thin.join(", ")
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "growth_window": input.settings.growth_window,
        "growth_clamp": input.settings.growth_clamp.to_string(),
        "confidence_bounds": [
            input.settings.min_confidence.to_string(),
            input.settings.max_confidence.to_string(),
        ],
        "tier_thresholds": {
            "high": input.settings.high_threshold.to_string(),
            "medium": input.settings.medium_threshold.to_string(),
        },
        "cumulative_cash_flow": "equal to net_cash_flow (no running balance)",
    });

    Ok(with_metadata(
        "Historical-pattern cash-flow forecast (confidence-weighted)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
