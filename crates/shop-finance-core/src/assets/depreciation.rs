//! Fixed-asset depreciation.
//!
//! Age is measured in fractional years of 365.25 days from the purchase date,
//! so leap years never introduce a jump. Every method floors the book value at
//! salvage and none of them can fail: malformed records (non-positive life,
//! salvage above price) depreciate by zero.
//!
//! All calculations use `rust_decimal::Decimal`. No `f64`.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::model::{DepreciationMethod, FixedAsset};
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::ShopFinanceResult;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Longest schedule table produced; depreciation itself is not limited.
pub const MAX_SCHEDULE_YEARS: i32 = 100;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub asset: FixedAsset,
    pub as_of_date: NaiveDate,
    /// Also return the year-by-year table over the useful life.
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub age_years: Years,
    pub depreciable_amount: Money,
    pub accumulated_depreciation: Money,
    pub book_value: Money,
    pub fully_depreciated: bool,
    pub method: DepreciationMethod,
    /// Schedule actually applied (units-of-production reports straight-line).
    pub effective_method: DepreciationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<DepreciationYear>>,
}

/// One row of a depreciation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationYear {
    pub year: i32,
    pub opening_book_value: Money,
    pub depreciation: Money,
    pub accumulated_depreciation: Money,
    pub closing_book_value: Money,
}

// ---------------------------------------------------------------------------
// Pure calculator
// ---------------------------------------------------------------------------

/// Elapsed fractional years between two dates, never negative.
pub fn asset_age_years(purchase_date: NaiveDate, as_of: NaiveDate) -> Years {
    let days = (as_of - purchase_date).num_days();
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(days) / DAYS_PER_YEAR
}

/// Accumulated depreciation of `asset` at `as_of`.
pub fn depreciation(asset: &FixedAsset, as_of: NaiveDate) -> Money {
    depreciation_for_age(asset, asset_age_years(asset.purchase_date, as_of))
}

/// `max(price - depreciation, salvage)` at `as_of`.
pub fn book_value(asset: &FixedAsset, as_of: NaiveDate) -> Money {
    book_value_after(asset, depreciation(asset, as_of))
}

/// Accumulated depreciation after `age` years of service.
pub fn depreciation_for_age(asset: &FixedAsset, age: Years) -> Money {
    if asset.useful_life <= 0 || age <= Decimal::ZERO || asset.depreciable_amount().is_zero() {
        return Decimal::ZERO;
    }

    match asset.depreciation_method {
        DepreciationMethod::StraightLine => straight_line(asset, age),
        DepreciationMethod::DecliningBalance => declining_balance(asset, age),
        DepreciationMethod::SumOfYears => sum_of_years(asset, age),
        // No production volumes are modelled.
        DepreciationMethod::UnitsOfProduction => straight_line(asset, age),
    }
}

/// Year-by-year table for years `1..=useful_life` (at most
/// [`MAX_SCHEDULE_YEARS`] rows), consistent with [`depreciation_for_age`].
pub fn depreciation_schedule(asset: &FixedAsset) -> Vec<DepreciationYear> {
    let years = asset.useful_life.clamp(0, MAX_SCHEDULE_YEARS);
    let mut rows = Vec::with_capacity(years as usize);
    let mut accumulated = Decimal::ZERO;

    for year in 1..=years {
        let opening_book_value = book_value_after(asset, accumulated);
        let closing_accumulated = depreciation_for_age(asset, Decimal::from(year));
        rows.push(DepreciationYear {
            year,
            opening_book_value,
            depreciation: closing_accumulated - accumulated,
            accumulated_depreciation: closing_accumulated,
            closing_book_value: book_value_after(asset, closing_accumulated),
        });
        accumulated = closing_accumulated;
    }

    rows
}

pub(crate) fn book_value_after(asset: &FixedAsset, accumulated: Money) -> Money {
    (asset.purchase_price - accumulated).max(asset.salvage_value)
}

fn straight_line(asset: &FixedAsset, age: Years) -> Money {
    let depreciable = asset.depreciable_amount();
    let annual = depreciable / Decimal::from(asset.useful_life);
    (annual * age).min(depreciable)
}

/// Double-declining balance: whole years first, then one pro-rated step.
fn declining_balance(asset: &FixedAsset, age: Years) -> Money {
    let rate = dec!(2) / Decimal::from(asset.useful_life);
    let salvage = asset.salvage_value;
    let whole_years = age.trunc();
    let fraction = age - whole_years;

    let mut book = asset.purchase_price;
    let mut total = Decimal::ZERO;

    for _ in 0..whole_years.to_u64().unwrap_or(u64::MAX) {
        if book <= salvage {
            break;
        }
        let year_dep = (book * rate).min(book - salvage);
        total += year_dep;
        book -= year_dep;
    }

    if fraction > Decimal::ZERO && book > salvage {
        total += (book * rate * fraction).min(book - salvage);
    }

    total
}

/// Sum-of-the-years'-digits. Digits are accumulated before scaling so a full
/// life lands exactly on the depreciable amount.
fn sum_of_years(asset: &FixedAsset, age: Years) -> Money {
    let life = i64::from(asset.useful_life);
    let depreciable = asset.depreciable_amount();
    let sum_of_years = Decimal::from(life * (life + 1) / 2);

    let full_years = age.trunc().to_i64().unwrap_or(i64::MAX);
    let fraction = age - age.trunc();

    // years 1..=n carry digits life, life - 1, ..., life - n + 1
    let n = Decimal::from(full_years.min(life));
    let mut digits = n * Decimal::from(life) - n * (n - Decimal::ONE) / dec!(2);
    if full_years < life && fraction > Decimal::ZERO {
        let remaining_life = life - full_years;
        digits += Decimal::from(remaining_life) * fraction;
    }

    // very long lives on large prices overflow the product; scale the
    // fraction instead
    let total = match depreciable.checked_mul(digits) {
        Some(product) => product / sum_of_years,
        None => depreciable * (digits / sum_of_years),
    };
    total.min(depreciable)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Depreciation and book value of one asset at a reporting date.
pub fn calculate_depreciation(
    input: &DepreciationInput,
) -> ShopFinanceResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let asset = &input.asset;

    debug!(
        asset = asset.label(),
        method = %asset.depreciation_method,
        as_of = %input.as_of_date,
        "computing depreciation"
    );

    if let Err(e) = asset.validate() {
        warn!(asset = asset.label(), error = %e, "depreciating invalid asset record");
        warnings.push(format!("{e}; depreciation degraded to zero where undefined."));
    }
    if input.as_of_date < asset.purchase_date {
        warnings.push(format!(
            "As-of date {} precedes purchase date {}; no depreciation accrued.",
            input.as_of_date, asset.purchase_date
        ));
    }
    if asset.depreciation_method == DepreciationMethod::UnitsOfProduction {
        warnings.push(
            "Units-of-production has no production volumes; straight-line applied.".into(),
        );
    }

    let age_years = asset_age_years(asset.purchase_date, input.as_of_date);
    if asset.useful_life > 0 && age_years > Decimal::from(asset.useful_life) {
        warnings.push(format!(
            "Asset is {} years old, past its {}-year useful life.",
            age_years.round_dp(2),
            asset.useful_life
        ));
    }

    let accumulated_depreciation = depreciation_for_age(asset, age_years);
    let depreciable_amount = asset.depreciable_amount();
    let book_value = book_value_after(asset, accumulated_depreciation);

    let schedule = if input.include_schedule {
        if asset.useful_life > MAX_SCHEDULE_YEARS {
            warnings.push(format!(
                "Schedule truncated to {MAX_SCHEDULE_YEARS} years."
            ));
        }
        Some(depreciation_schedule(asset))
    } else {
        None
    };

    let output = DepreciationOutput {
        age_years,
        depreciable_amount,
        accumulated_depreciation,
        book_value,
        fully_depreciated: !depreciable_amount.is_zero()
            && accumulated_depreciation >= depreciable_amount,
        method: asset.depreciation_method,
        effective_method: asset.depreciation_method.effective(),
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "days_per_year": DAYS_PER_YEAR.to_string(),
        "declining_balance_factor": "2",
        "book_value_floor": "salvage_value",
        "units_of_production": "straight_line fallback",
    });

    Ok(with_metadata(
        "Fixed-asset depreciation (accumulated to as-of date)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
