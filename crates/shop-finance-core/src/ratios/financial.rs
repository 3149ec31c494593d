//! Liquidity, profitability, leverage and efficiency ratios.
//!
//! Reports must render on incomplete books, so a ratio whose denominator is
//! zero is reported as exactly zero rather than an error, NaN or infinity.
//! The envelope lists every ratio that degraded that way.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::snapshot::CapitalSnapshot;
use crate::config::RatioSettings;
use crate::types::{with_metadata, CashFlowCategory, CashFlowEntry, ComputationOutput, Money, Multiple, Rate};
use crate::{ShopFinanceError, ShopFinanceResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Flow figures for the reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioFigures {
    pub inventory_value: Money,
    pub revenue: Money,
    pub net_income: Money,
    /// Positive figure; see [`cost_of_goods_sold`].
    pub cost_of_goods_sold: Money,
    /// Positive figure; see [`interest_expense`].
    pub interest_expense: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    // Liquidity
    pub current_ratio: Multiple,
    pub quick_ratio: Multiple,
    pub cash_ratio: Multiple,
    pub working_capital_ratio: Rate,
    // Profitability
    pub gross_profit_margin: Rate,
    pub net_profit_margin: Rate,
    pub return_on_assets: Rate,
    pub return_on_equity: Rate,
    // Efficiency
    pub inventory_turnover: Multiple,
    /// Fixed placeholder; no receivables ledger is modelled.
    pub receivables_turnover: Multiple,
    pub asset_turnover: Multiple,
    // Leverage
    pub debt_to_assets: Rate,
    pub debt_to_equity: Multiple,
    pub equity_ratio: Rate,
    pub interest_coverage: Multiple,
}

/// Inclusive date range used to select cash-flow entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub snapshot: CapitalSnapshot,
    pub inventory_value: Money,
    pub revenue: Money,
    pub net_income: Money,
    /// Ledger entries from which COGS and interest expense are derived.
    #[serde(default)]
    pub cash_flows: Vec<CashFlowEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<ReportingPeriod>,
    #[serde(default)]
    pub settings: RatioSettings,
}

// ---------------------------------------------------------------------------
// Ledger-derived figures
// ---------------------------------------------------------------------------

/// Cost of goods sold: operating outflows booked under the COGS subcategory,
/// returned as a positive amount.
pub fn cost_of_goods_sold(entries: &[CashFlowEntry], subcategory: &str) -> Money {
    outflow_total(entries, CashFlowCategory::Operating, subcategory)
}

/// Interest expense: financing outflows booked under the interest
/// subcategory, returned as a positive amount.
pub fn interest_expense(entries: &[CashFlowEntry], subcategory: &str) -> Money {
    outflow_total(entries, CashFlowCategory::Financing, subcategory)
}

fn outflow_total(entries: &[CashFlowEntry], category: CashFlowCategory, subcategory: &str) -> Money {
    entries
        .iter()
        .filter(|e| e.category == category && e.subcategory == subcategory)
        .filter(|e| e.amount < Decimal::ZERO)
        .map(|e| -e.amount)
        .sum()
}

// ---------------------------------------------------------------------------
// Pure calculator
// ---------------------------------------------------------------------------

/// Compute all ratios with the default ledger conventions.
pub fn compute_ratios(snapshot: &CapitalSnapshot, figures: &RatioFigures) -> FinancialRatios {
    compute_ratios_with(snapshot, figures, &RatioSettings::default())
}

pub fn compute_ratios_with(
    snapshot: &CapitalSnapshot,
    figures: &RatioFigures,
    settings: &RatioSettings,
) -> FinancialRatios {
    let current_assets = snapshot.current_assets_approx;
    let current_liabilities = snapshot.current_liabilities;
    let total_assets = snapshot.total_assets;
    let total_liabilities = snapshot.total_liabilities;
    let total_equity = snapshot.total_equity();
    let revenue = figures.revenue;
    let net_income = figures.net_income;
    let cogs = figures.cost_of_goods_sold;

    FinancialRatios {
        current_ratio: ratio(current_assets, current_liabilities),
        quick_ratio: ratio(current_assets - figures.inventory_value, current_liabilities),
        cash_ratio: ratio(snapshot.cash_equivalent, current_liabilities),
        working_capital_ratio: ratio(snapshot.working_capital, total_assets),
        gross_profit_margin: ratio(revenue - cogs, revenue),
        net_profit_margin: ratio(net_income, revenue),
        return_on_assets: ratio(net_income, total_assets),
        return_on_equity: ratio(net_income, total_equity),
        inventory_turnover: ratio(cogs, figures.inventory_value),
        receivables_turnover: settings.receivables_turnover,
        asset_turnover: ratio(revenue, total_assets),
        debt_to_assets: ratio(total_liabilities, total_assets),
        debt_to_equity: ratio(total_liabilities, total_equity),
        equity_ratio: ratio(total_equity, total_assets),
        interest_coverage: ratio(net_income, figures.interest_expense),
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Names of the ratios that degrade to zero for these inputs.
pub fn degraded_ratios(snapshot: &CapitalSnapshot, figures: &RatioFigures) -> Vec<&'static str> {
    let mut degraded = Vec::new();
    if snapshot.current_liabilities.is_zero() {
        degraded.extend(["current_ratio", "quick_ratio", "cash_ratio"]);
    }
    if snapshot.total_assets.is_zero() {
        degraded.extend([
            "working_capital_ratio",
            "return_on_assets",
            "asset_turnover",
            "debt_to_assets",
            "equity_ratio",
        ]);
    }
    if figures.revenue.is_zero() {
        degraded.extend(["gross_profit_margin", "net_profit_margin"]);
    }
    if snapshot.total_equity().is_zero() {
        degraded.extend(["return_on_equity", "debt_to_equity"]);
    }
    if figures.inventory_value.is_zero() {
        degraded.push("inventory_turnover");
    }
    if figures.interest_expense.is_zero() {
        degraded.push("interest_coverage");
    }
    degraded
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ratio report from a balance-sheet snapshot and the period's ledger entries.
pub fn calculate_financial_ratios(
    input: &RatioInput,
) -> ShopFinanceResult<ComputationOutput<FinancialRatios>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.settings.validate()?;
    if let Some(period) = input.period {
        if period.start > period.end {
            return Err(ShopFinanceError::DateError(format!(
                "reporting period starts {} after it ends {}",
                period.start, period.end
            )));
        }
    }

    let entries: Vec<CashFlowEntry> = match input.period {
        Some(period) => input
            .cash_flows
            .iter()
            .filter(|e| period.contains(e.date))
            .cloned()
            .collect(),
        None => input.cash_flows.clone(),
    };

    debug!(
        entries = entries.len(),
        total = input.cash_flows.len(),
        "computing financial ratios"
    );

    let figures = RatioFigures {
        inventory_value: input.inventory_value,
        revenue: input.revenue,
        net_income: input.net_income,
        cost_of_goods_sold: cost_of_goods_sold(&entries, &input.settings.cogs_subcategory),
        interest_expense: interest_expense(&entries, &input.settings.interest_subcategory),
    };

    let degraded = degraded_ratios(&input.snapshot, &figures);
    if !degraded.is_empty() {
        warn!(ratios = ?degraded, "zero denominators; ratios reported as 0");
        warnings.push(format!(
            "Zero denominator; reported as 0: {}.",
            degraded.join(", ")
        ));
    }
    if input.snapshot.has_negative_equity() {
        warnings.push(format!(
            "Total equity is negative ({}); equity-based ratios change sign.",
            input.snapshot.total_equity()
        ));
    }

    let output = compute_ratios_with(&input.snapshot, &figures, &input.settings);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "current_assets": "current_assets_approx (inventory_value + retained_earnings)",
        "total_equity": "total_assets - total_liabilities",
        "cost_of_goods_sold": figures.cost_of_goods_sold.to_string(),
        "interest_expense": figures.interest_expense.to_string(),
        "receivables_turnover": "fixed placeholder",
        "zero_denominator": "ratio reported as 0",
    });

    Ok(with_metadata(
        "Financial ratio analysis (liquidity, profitability, efficiency, leverage)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
