//! Asset register totals.
//!
//! Disposed and sold assets are valued individually but never counted in the
//! register totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use super::depreciation::{asset_age_years, book_value_after, depreciation_for_age};
use super::model::{AssetStatus, DepreciationMethod, FixedAsset};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ShopFinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegisterInput {
    pub assets: Vec<FixedAsset>,
    pub as_of_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegisterSummary {
    pub total_cost: Money,
    pub total_depreciation: Money,
    pub total_book_value: Money,
    pub included_count: usize,
    pub excluded_count: usize,
    pub fully_depreciated_count: usize,
    pub by_method: Vec<MethodSubtotal>,
    pub valuations: Vec<AssetValuation>,
}

/// Totals for the included assets sharing one depreciation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSubtotal {
    pub method: DepreciationMethod,
    pub count: usize,
    pub cost: Money,
    pub depreciation: Money,
    pub book_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetValuation {
    pub id: String,
    pub name: String,
    pub status: AssetStatus,
    /// False for disposed / sold assets.
    pub included: bool,
    pub depreciation: Money,
    pub book_value: Money,
}

// ---------------------------------------------------------------------------
// Pure aggregates
// ---------------------------------------------------------------------------

/// Sum of book values over assets still in service.
pub fn total_book_value(assets: &[FixedAsset], as_of: NaiveDate) -> Money {
    in_service(assets)
        .map(|asset| value_asset(asset, as_of).1)
        .sum()
}

/// Sum of accumulated depreciation over assets still in service.
pub fn total_depreciation(assets: &[FixedAsset], as_of: NaiveDate) -> Money {
    in_service(assets)
        .map(|asset| value_asset(asset, as_of).0)
        .sum()
}

fn in_service(assets: &[FixedAsset]) -> impl Iterator<Item = &FixedAsset> {
    assets.iter().filter(|asset| !asset.status.is_retired())
}

/// (accumulated depreciation, book value)
fn value_asset(asset: &FixedAsset, as_of: NaiveDate) -> (Money, Money) {
    let age = asset_age_years(asset.purchase_date, as_of);
    let dep = depreciation_for_age(asset, age);
    (dep, book_value_after(asset, dep))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value a whole asset register at a reporting date.
pub fn summarize_register(
    input: &AssetRegisterInput,
) -> ShopFinanceResult<ComputationOutput<AssetRegisterSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    debug!(
        assets = input.assets.len(),
        as_of = %input.as_of_date,
        "summarising asset register"
    );

    if input.assets.is_empty() {
        warnings.push("Asset register is empty; all totals are zero.".into());
    }

    let mut total_cost = Decimal::ZERO;
    let mut total_depreciation = Decimal::ZERO;
    let mut total_book_value = Decimal::ZERO;
    let mut included_count = 0usize;
    let mut excluded_count = 0usize;
    let mut fully_depreciated_count = 0usize;
    let mut by_method: BTreeMap<DepreciationMethod, MethodSubtotal> = BTreeMap::new();
    let mut valuations = Vec::with_capacity(input.assets.len());
    let mut fallback_used = false;

    for asset in &input.assets {
        if let Err(e) = asset.validate() {
            warn!(asset = asset.label(), error = %e, "invalid asset in register");
            warnings.push(e.to_string());
        }

        let (dep, book) = value_asset(asset, input.as_of_date);
        let included = !asset.status.is_retired();

        valuations.push(AssetValuation {
            id: asset.id.clone(),
            name: asset.name.clone(),
            status: asset.status,
            included,
            depreciation: dep,
            book_value: book,
        });

        if !included {
            excluded_count += 1;
            continue;
        }

        included_count += 1;
        total_cost += asset.purchase_price;
        total_depreciation += dep;
        total_book_value += book;
        let depreciable = asset.depreciable_amount();
        if !depreciable.is_zero() && dep >= depreciable {
            fully_depreciated_count += 1;
        }
        fallback_used |= asset.depreciation_method == DepreciationMethod::UnitsOfProduction;

        let subtotal = by_method
            .entry(asset.depreciation_method)
            .or_insert_with(|| MethodSubtotal {
                method: asset.depreciation_method,
                count: 0,
                cost: Decimal::ZERO,
                depreciation: Decimal::ZERO,
                book_value: Decimal::ZERO,
            });
        subtotal.count += 1;
        subtotal.cost += asset.purchase_price;
        subtotal.depreciation += dep;
        subtotal.book_value += book;
    }

    if fallback_used {
        warnings.push(
            "Units-of-production assets were depreciated straight-line (no production volumes)."
                .into(),
        );
    }

    let output = AssetRegisterSummary {
        total_cost,
        total_depreciation,
        total_book_value,
        included_count,
        excluded_count,
        fully_depreciated_count,
        by_method: by_method.into_values().collect(),
        valuations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "excluded_statuses": ["disposed", "sold"],
        "as_of_date": input.as_of_date.to_string(),
    });

    Ok(with_metadata(
        "Asset register valuation (in-service assets only)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::depreciation::{book_value, depreciation};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asset(id: &str, price: Decimal, status: AssetStatus) -> FixedAsset {
        FixedAsset {
            id: id.into(),
            name: String::new(),
            purchase_date: date(2020, 1, 1),
            purchase_price: price,
            salvage_value: Decimal::ZERO,
            useful_life: 4,
            depreciation_method: DepreciationMethod::StraightLine,
            status,
        }
    }

    fn register() -> Vec<FixedAsset> {
        vec![
            asset("A", dec!(4_000), AssetStatus::Active),
            asset("B", dec!(8_000), AssetStatus::UnderMaintenance),
            asset("C", dec!(1_000_000), AssetStatus::Disposed),
            asset("D", dec!(2_000_000), AssetStatus::Sold),
        ]
    }

    #[test]
    fn test_totals_exclude_retired_assets() {
        // 2024-01-01 is exactly 4 years: everything fully depreciated
        let as_of = date(2024, 1, 1);
        assert_eq!(total_depreciation(&register(), as_of), dec!(12_000));
        assert_eq!(total_book_value(&register(), as_of), Decimal::ZERO);
    }

    #[test]
    fn test_totals_half_life() {
        let as_of = date(2022, 1, 1);
        let assets = register();
        let expected_book = book_value(&assets[0], as_of) + book_value(&assets[1], as_of);
        let expected_dep = depreciation(&assets[0], as_of) + depreciation(&assets[1], as_of);
        assert_eq!(total_book_value(&assets, as_of), expected_book);
        assert_eq!(total_depreciation(&assets, as_of), expected_dep);
        assert_eq!(expected_book + expected_dep, dec!(12_000));
    }

    #[test]
    fn test_empty_register_is_zero() {
        let as_of = date(2022, 1, 1);
        assert_eq!(total_book_value(&[], as_of), Decimal::ZERO);
        assert_eq!(total_depreciation(&[], as_of), Decimal::ZERO);
    }

    #[test]
    fn test_summary_counts_and_valuations() {
        let out = summarize_register(&AssetRegisterInput {
            assets: register(),
            as_of_date: date(2024, 1, 1),
        })
        .unwrap();
        let s = &out.result;
        assert_eq!(s.included_count, 2);
        assert_eq!(s.excluded_count, 2);
        assert_eq!(s.fully_depreciated_count, 2);
        assert_eq!(s.total_cost, dec!(12_000));
        assert_eq!(s.valuations.len(), 4);
        // retired assets are still valued individually
        let sold = s.valuations.iter().find(|v| v.id == "D").unwrap();
        assert!(!sold.included);
        assert_eq!(sold.depreciation, dec!(2_000_000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_summary_groups_by_method() {
        let mut assets = register();
        assets[1].depreciation_method = DepreciationMethod::UnitsOfProduction;
        let out = summarize_register(&AssetRegisterInput {
            assets,
            as_of_date: date(2024, 1, 1),
        })
        .unwrap();
        let methods: Vec<DepreciationMethod> =
            out.result.by_method.iter().map(|m| m.method).collect();
        assert_eq!(
            methods,
            vec![
                DepreciationMethod::StraightLine,
                DepreciationMethod::UnitsOfProduction
            ]
        );
        assert!(out.warnings.iter().any(|w| w.contains("Units-of-production")));
    }

    #[test]
    fn test_summary_warns_on_invalid_records() {
        let mut assets = register();
        assets[0].useful_life = 0;
        let out = summarize_register(&AssetRegisterInput {
            assets,
            as_of_date: date(2024, 1, 1),
        })
        .unwrap();
        // zero-life asset keeps its full price as book value
        assert_eq!(out.result.total_book_value, dec!(4_000));
        assert!(out.warnings.iter().any(|w| w.contains("'A'")));
    }
}
