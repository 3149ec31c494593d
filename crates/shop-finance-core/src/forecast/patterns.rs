//! Per-subcategory statistics over a cash-flow history.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ForecastSettings;
use crate::types::{CashFlowCategory, CashFlowEntry, Money, Rate};

/// What the history says about one subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPattern {
    pub subcategory: String,
    /// Category of the most recent entry in the group.
    pub category: CashFlowCategory,
    pub observations: usize,
    pub avg_amount: Money,
    /// Population standard deviation of the amounts; `None` if it overflowed.
    pub std_dev: Option<Money>,
    /// Clamped to `[-growth_clamp, growth_clamp]`.
    pub growth_rate: Rate,
    /// Clamped to `[min_confidence, max_confidence]`.
    pub confidence: Rate,
}

impl CashFlowPattern {
    /// `avg × (1 + growth)`, signed.
    pub fn projected_amount(&self) -> Money {
        self.avg_amount * (Decimal::ONE + self.growth_rate)
    }
}

/// Group `history` by subcategory (sorted by name) and summarise each group.
pub fn extract_patterns(
    history: &[CashFlowEntry],
    settings: &ForecastSettings,
) -> Vec<CashFlowPattern> {
    let mut groups: BTreeMap<&str, Vec<&CashFlowEntry>> = BTreeMap::new();
    for entry in history {
        groups.entry(entry.subcategory.as_str()).or_default().push(entry);
    }

    groups
        .into_iter()
        .filter_map(|(subcategory, mut entries)| {
            entries.sort_by_key(|e| e.date);
            let amounts: Vec<Money> = entries.iter().map(|e| e.amount).collect();
            let category = entries.last()?.category;
            Some(summarise(subcategory, category, &amounts, settings))
        })
        .collect()
}

fn summarise(
    subcategory: &str,
    category: CashFlowCategory,
    amounts: &[Money],
    settings: &ForecastSettings,
) -> CashFlowPattern {
    let avg_amount = mean(amounts);
    let std_dev = population_std_dev(amounts, avg_amount);

    CashFlowPattern {
        subcategory: subcategory.to_string(),
        category,
        observations: amounts.len(),
        avg_amount,
        std_dev,
        growth_rate: growth_rate(amounts, settings),
        confidence: confidence(avg_amount, std_dev, settings),
    }
}

/// Mean of the latest window against the mean of the earliest window.
/// A zero early mean gives no usable base, so growth is zero. A base so
/// small that the quotient overflows lands on the clamp in the direction of
/// the change.
pub fn growth_rate(amounts: &[Money], settings: &ForecastSettings) -> Rate {
    let window = settings.growth_window.min(amounts.len());
    if window == 0 {
        return Decimal::ZERO;
    }
    let old_avg = mean(&amounts[..window]);
    let recent_avg = mean(&amounts[amounts.len() - window..]);
    if old_avg.is_zero() {
        return Decimal::ZERO;
    }
    let change = recent_avg - old_avg;
    let growth = change
        .checked_div(old_avg.abs())
        .unwrap_or(if change.is_sign_negative() {
            -settings.growth_clamp
        } else {
            settings.growth_clamp
        });
    bounded(growth, -settings.growth_clamp, settings.growth_clamp)
}

/// `1 - σ/|avg|` clamped to the configured bounds. A zero average (or an
/// overflowing σ or quotient) leaves the ratio unbounded, which lands on the
/// floor.
pub fn confidence(avg_amount: Money, std_dev: Option<Money>, settings: &ForecastSettings) -> Rate {
    let raw = std_dev
        .filter(|_| !avg_amount.is_zero())
        .and_then(|sd| sd.checked_div(avg_amount.abs()))
        .map(|dispersion| Decimal::ONE - dispersion)
        .unwrap_or(settings.min_confidence);
    bounded(raw, settings.min_confidence, settings.max_confidence)
}

/// `value` limited to `[lower, upper]`. Unlike `Ord::clamp` this never
/// panics; inverted bounds resolve to `upper`.
fn bounded(value: Decimal, lower: Decimal, upper: Decimal) -> Decimal {
    value.max(lower).min(upper)
}

fn mean(values: &[Money]) -> Money {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

fn population_std_dev(values: &[Money], mean: Money) -> Option<Money> {
    if values.is_empty() {
        return Some(Decimal::ZERO);
    }
    let mut sum_sq = Decimal::ZERO;
    for v in values {
        let deviation = *v - mean;
        sum_sq = sum_sq.checked_add(deviation.checked_mul(deviation)?)?;
    }
    (sum_sq / Decimal::from(values.len())).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn month(i: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .checked_add_months(chrono::Months::new(i))
            .unwrap()
    }

    fn series(subcategory: &str, amounts: &[Decimal]) -> Vec<CashFlowEntry> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| {
                CashFlowEntry::new(month(i as u32), CashFlowCategory::Operating, subcategory, *a)
            })
            .collect()
    }

    #[test]
    fn test_flat_series() {
        let history = series("sales", &[dec!(10_000_000); 12]);
        let patterns = extract_patterns(&history, &ForecastSettings::default());
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.observations, 12);
        assert_eq!(p.avg_amount, dec!(10_000_000));
        assert_eq!(p.std_dev, Some(Decimal::ZERO));
        assert_eq!(p.growth_rate, Decimal::ZERO);
        assert_eq!(p.confidence, dec!(0.95));
    }

    #[test]
    fn test_groups_sorted_by_subcategory() {
        let mut history = series("utilities", &[dec!(-200)]);
        history.extend(series("rent", &[dec!(-1000)]));
        history.extend(series("sales", &[dec!(5000)]));
        let names: Vec<String> = extract_patterns(&history, &ForecastSettings::default())
            .into_iter()
            .map(|p| p.subcategory)
            .collect();
        assert_eq!(names, vec!["rent", "sales", "utilities"]);
    }

    #[test]
    fn test_growth_compares_first_and_last_six() {
        let mut amounts = vec![dec!(100); 6];
        amounts.extend(vec![dec!(120); 6]);
        let growth = growth_rate(&amounts, &ForecastSettings::default());
        assert_eq!(growth, dec!(0.2));
    }

    #[test]
    fn test_growth_uses_history_order_not_input_order() {
        let mut history = series("sales", &[dec!(100), dec!(100), dec!(150)]);
        history.reverse();
        let p = &extract_patterns(&history, &ForecastSettings::default())[0];
        // fewer than six entries: both windows cover the whole history
        assert_eq!(p.growth_rate, Decimal::ZERO);

        let settings = ForecastSettings {
            growth_window: 1,
            ..Default::default()
        };
        let p = &extract_patterns(&history, &settings)[0];
        assert_eq!(p.growth_rate, dec!(0.5));
    }

    #[test]
    fn test_growth_clamped() {
        let settings = ForecastSettings::default();
        let amounts = vec![dec!(10), dec!(10), dec!(1000), dec!(1000)];
        let settings_one = ForecastSettings {
            growth_window: 2,
            ..settings.clone()
        };
        assert_eq!(growth_rate(&amounts, &settings_one), dec!(0.5));
        let falling = vec![dec!(1000), dec!(1000), dec!(1), dec!(1)];
        assert_eq!(growth_rate(&falling, &settings_one), dec!(-0.5));
    }

    #[test]
    fn test_growth_zero_when_old_average_zero() {
        let settings = ForecastSettings {
            growth_window: 2,
            ..Default::default()
        };
        let amounts = vec![dec!(50), dec!(-50), dec!(400), dec!(400)];
        assert_eq!(growth_rate(&amounts, &settings), Decimal::ZERO);
    }

    #[test]
    fn test_growth_relative_to_magnitude_for_outflows() {
        let settings = ForecastSettings {
            growth_window: 1,
            ..Default::default()
        };
        // outflow shrinking from -100 to -90: (-90 - -100) / 100 = +0.1
        assert_eq!(growth_rate(&[dec!(-100), dec!(-90)], &settings), dec!(0.1));
    }

    #[test]
    fn test_confidence_bounds() {
        let settings = ForecastSettings::default();
        // sd = 50 on mean 100 => 0.5
        let p = &extract_patterns(&series("x", &[dec!(50), dec!(150)]), &settings)[0];
        let sd = p.std_dev.unwrap();
        assert!((sd - dec!(50)).abs() < dec!(0.000001), "sd = {sd}");
        assert!((p.confidence - dec!(0.5)).abs() < dec!(0.000001));
        // very noisy => floor
        let p = &extract_patterns(&series("x", &[dec!(-900), dec!(1000)]), &settings)[0];
        assert_eq!(p.confidence, dec!(0.3));
    }

    #[test]
    fn test_zero_average_gets_floor_confidence() {
        let settings = ForecastSettings::default();
        assert_eq!(confidence(Decimal::ZERO, Some(dec!(10)), &settings), dec!(0.3));
        assert_eq!(confidence(Decimal::ZERO, Some(Decimal::ZERO), &settings), dec!(0.3));
        assert_eq!(confidence(dec!(100), None, &settings), dec!(0.3));
    }

    #[test]
    fn test_tiny_base_growth_saturates_at_clamp() {
        let settings = ForecastSettings::default();
        let mut rising = vec![dec!(0.000000000000000000000000001); 6];
        rising.extend(vec![dec!(1_000_000); 6]);
        assert_eq!(growth_rate(&rising, &settings), dec!(0.5));

        let mut falling = vec![dec!(0.000000000000000000000000001); 6];
        falling.extend(vec![dec!(-1_000_000); 6]);
        assert_eq!(growth_rate(&falling, &settings), dec!(-0.5));
    }

    #[test]
    fn test_tiny_average_with_wide_spread_gets_floor_confidence() {
        let settings = ForecastSettings::default();
        // mean 1e-27 against a spread of ~8e11
        let history = series(
            "transfers",
            &[
                dec!(1_000_000_000_000),
                dec!(-1_000_000_000_000),
                dec!(0.000000000000000000000000003),
            ],
        );
        let p = &extract_patterns(&history, &settings)[0];
        assert_eq!(p.avg_amount, dec!(0.000000000000000000000000001));
        assert_eq!(p.confidence, dec!(0.3));
        assert_eq!(p.growth_rate, Decimal::ZERO);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let settings = ForecastSettings {
            growth_clamp: dec!(-0.2),
            min_confidence: dec!(0.9),
            max_confidence: dec!(0.4),
            ..Default::default()
        };
        assert_eq!(growth_rate(&[dec!(100), dec!(300)], &settings), dec!(-0.2));
        assert_eq!(confidence(dec!(100), Some(Decimal::ZERO), &settings), dec!(0.4));
    }

    #[test]
    fn test_category_taken_from_latest_entry() {
        let history = vec![
            CashFlowEntry::new(month(3), CashFlowCategory::Financing, "loan", dec!(-10)),
            CashFlowEntry::new(month(1), CashFlowCategory::Investing, "loan", dec!(-10)),
        ];
        let p = &extract_patterns(&history, &ForecastSettings::default())[0];
        assert_eq!(p.category, CashFlowCategory::Financing);
    }

    #[test]
    fn test_projected_amount() {
        let p = CashFlowPattern {
            subcategory: "rent".into(),
            category: CashFlowCategory::Operating,
            observations: 12,
            avg_amount: dec!(-1000),
            std_dev: Some(Decimal::ZERO),
            growth_rate: dec!(0.1),
            confidence: dec!(0.95),
        };
        assert_eq!(p.projected_amount(), dec!(-1100));
    }
}
