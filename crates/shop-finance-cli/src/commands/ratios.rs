use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use shop_finance_core::config::RatioSettings;
use shop_finance_core::ratios::financial::{self, RatioInput};
use shop_finance_core::ratios::CapitalSnapshot;
use shop_finance_core::{CashFlowCategory, CashFlowEntry, EngineConfig};

use crate::input;

/// Arguments for the ratio report
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RatiosArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Share capital
    #[arg(long, default_value = "0")]
    pub share_capital: Decimal,

    /// Retained earnings
    #[arg(long, default_value = "0")]
    pub retained_earnings: Decimal,

    /// Short-term debt
    #[arg(long, default_value = "0")]
    pub short_term_debt: Decimal,

    /// Long-term debt
    #[arg(long, default_value = "0")]
    pub long_term_debt: Decimal,

    /// Total assets
    #[arg(long)]
    pub total_assets: Option<Decimal>,

    /// Total liabilities
    #[arg(long)]
    pub total_liabilities: Option<Decimal>,

    /// Current liabilities
    #[arg(long)]
    pub current_liabilities: Option<Decimal>,

    /// Cash and equivalents
    #[arg(long, alias = "cash", default_value = "0")]
    pub cash_equivalent: Decimal,

    /// Working capital
    #[arg(long, default_value = "0")]
    pub working_capital: Decimal,

    /// Current assets (defaults to inventory value + retained earnings)
    #[arg(long)]
    pub current_assets: Option<Decimal>,

    /// Inventory value on hand
    #[arg(long, default_value = "0")]
    pub inventory_value: Decimal,

    /// Revenue for the period
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Net income for the period
    #[arg(long)]
    pub net_income: Option<Decimal>,

    /// Cost of goods sold for the period (positive)
    #[arg(long, default_value = "0")]
    pub cogs: Decimal,

    /// Interest expense for the period (positive)
    #[arg(long, default_value = "0")]
    pub interest_expense: Decimal,
}

pub fn run_ratios(
    args: RatiosArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ratio_input: RatioInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        from_flags(args, config)?
    };

    if let Some(config) = config {
        ratio_input.settings = config.ratios.clone();
    }

    let result = financial::calculate_financial_ratios(&ratio_input)?;
    Ok(serde_json::to_value(result)?)
}

fn from_flags(
    args: RatiosArgs,
    config: Option<&EngineConfig>,
) -> Result<RatioInput, Box<dyn std::error::Error>> {
    let mut snapshot = CapitalSnapshot {
        share_capital: args.share_capital,
        retained_earnings: args.retained_earnings,
        short_term_debt: args.short_term_debt,
        long_term_debt: args.long_term_debt,
        total_assets: args
            .total_assets
            .ok_or("--total-assets is required (or provide --input)")?,
        total_liabilities: args
            .total_liabilities
            .ok_or("--total-liabilities is required (or provide --input)")?,
        current_liabilities: args
            .current_liabilities
            .ok_or("--current-liabilities is required (or provide --input)")?,
        cash_equivalent: args.cash_equivalent,
        working_capital: args.working_capital,
        current_assets_approx: Decimal::ZERO,
    };
    snapshot = match args.current_assets {
        Some(current_assets) => CapitalSnapshot {
            current_assets_approx: current_assets,
            ..snapshot
        },
        None => snapshot.with_approximate_current_assets(args.inventory_value),
    };

    let settings = config.map(|c| c.ratios.clone()).unwrap_or_default();
    let cash_flows = period_totals(&settings, args.cogs, args.interest_expense, Local::now().date_naive());

    Ok(RatioInput {
        snapshot,
        inventory_value: args.inventory_value,
        revenue: args
            .revenue
            .ok_or("--revenue is required (or provide --input)")?,
        net_income: args
            .net_income
            .ok_or("--net-income is required (or provide --input)")?,
        cash_flows,
        period: None,
        settings,
    })
}

/// Book period totals given on the command line as single ledger outflows.
fn period_totals(
    settings: &RatioSettings,
    cogs: Decimal,
    interest_expense: Decimal,
    date: NaiveDate,
) -> Vec<CashFlowEntry> {
    let mut entries = Vec::new();
    if !cogs.is_zero() {
        entries.push(CashFlowEntry::new(
            date,
            CashFlowCategory::Operating,
            settings.cogs_subcategory.clone(),
            -cogs.abs(),
        ));
    }
    if !interest_expense.is_zero() {
        entries.push(CashFlowEntry::new(
            date,
            CashFlowCategory::Financing,
            settings.interest_subcategory.clone(),
            -interest_expense.abs(),
        ));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_period_totals_feed_ledger_helpers() {
        let settings = RatioSettings::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let entries = period_totals(&settings, dec!(140_000_000), dec!(3_500_000), date);
        assert_eq!(
            financial::cost_of_goods_sold(&entries, &settings.cogs_subcategory),
            dec!(140_000_000)
        );
        assert_eq!(
            financial::interest_expense(&entries, &settings.interest_subcategory),
            dec!(3_500_000)
        );
    }

    #[test]
    fn test_zero_totals_book_nothing() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(period_totals(&RatioSettings::default(), Decimal::ZERO, Decimal::ZERO, date).is_empty());
    }
}
