use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::{ShopFinanceError, ShopFinanceResult};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    StraightLine,
    /// Double-declining balance (rate = 2 / useful life).
    DecliningBalance,
    /// Sum-of-the-years'-digits.
    SumOfYears,
    /// No production volumes are recorded, so this is computed exactly like
    /// straight-line. Callers needing unit-based depreciation must supply
    /// their own figures.
    UnitsOfProduction,
}

impl DepreciationMethod {
    /// The schedule actually applied when computing this method.
    pub fn effective(self) -> DepreciationMethod {
        match self {
            Self::UnitsOfProduction => Self::StraightLine,
            other => other,
        }
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StraightLine => "straight_line",
            Self::DecliningBalance => "declining_balance",
            Self::SumOfYears => "sum_of_years",
            Self::UnitsOfProduction => "units_of_production",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for DepreciationMethod {
    type Err = ShopFinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "straight_line" | "sl" => Ok(Self::StraightLine),
            "declining_balance" | "ddb" => Ok(Self::DecliningBalance),
            "sum_of_years" | "syd" => Ok(Self::SumOfYears),
            "units_of_production" | "uop" => Ok(Self::UnitsOfProduction),
            other => Err(ShopFinanceError::InvalidInput {
                field: "depreciation_method".into(),
                reason: format!("unknown method '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Active,
    UnderMaintenance,
    Disposed,
    Sold,
}

impl AssetStatus {
    /// Disposed and sold assets drop out of register totals.
    pub fn is_retired(self) -> bool {
        matches!(self, Self::Disposed | Self::Sold)
    }

    pub fn is_terminal(self) -> bool {
        self.is_retired()
    }

    /// active <-> under_maintenance, either -> disposed/sold; retired is final.
    pub fn can_transition_to(self, next: AssetStatus) -> bool {
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (from, to) if from == to => false,
            (Self::Active, Self::UnderMaintenance) | (Self::UnderMaintenance, Self::Active) => true,
            (_, to) => to.is_retired(),
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::UnderMaintenance => "under_maintenance",
            Self::Disposed => "disposed",
            Self::Sold => "sold",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// FixedAsset
// ---------------------------------------------------------------------------

/// A capital asset under depreciation, as recorded by the inventory module.
///
/// Records arriving from storage are not re-validated by the calculator; it
/// degrades to zero depreciation on malformed data instead. Use
/// [`FixedAsset::new`] or [`FixedAsset::validate`] where records are created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAsset {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Money,
    pub salvage_value: Money,
    /// Useful life in whole years.
    pub useful_life: i32,
    pub depreciation_method: DepreciationMethod,
    #[serde(default)]
    pub status: AssetStatus,
}

impl FixedAsset {
    /// Build an active asset, rejecting records the calculator cannot depreciate.
    pub fn new(
        id: impl Into<String>,
        purchase_date: NaiveDate,
        purchase_price: Money,
        salvage_value: Money,
        useful_life: i32,
        depreciation_method: DepreciationMethod,
    ) -> ShopFinanceResult<Self> {
        let asset = Self {
            id: id.into(),
            name: String::new(),
            purchase_date,
            purchase_price,
            salvage_value,
            useful_life,
            depreciation_method,
            status: AssetStatus::Active,
        };
        asset.validate()?;
        Ok(asset)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> ShopFinanceResult<()> {
        let reject = |reason: String| -> ShopFinanceResult<()> {
            Err(ShopFinanceError::InvalidAsset {
                asset: self.label().to_string(),
                reason,
            })
        };
        if self.useful_life <= 0 {
            return reject(format!(
                "useful life must be positive, got {}",
                self.useful_life
            ));
        }
        if self.purchase_price < Decimal::ZERO {
            return reject("purchase price cannot be negative".into());
        }
        if self.salvage_value < Decimal::ZERO {
            return reject("salvage value cannot be negative".into());
        }
        if self.salvage_value > self.purchase_price {
            return reject(format!(
                "salvage value {} exceeds purchase price {}",
                self.salvage_value, self.purchase_price
            ));
        }
        Ok(())
    }

    /// Price less salvage, never negative.
    pub fn depreciable_amount(&self) -> Money {
        (self.purchase_price - self.salvage_value).max(Decimal::ZERO)
    }

    /// Move to a new lifecycle status, returning the updated record.
    pub fn transition(&self, next: AssetStatus) -> ShopFinanceResult<Self> {
        if !self.status.can_transition_to(next) {
            return Err(ShopFinanceError::InvalidAsset {
                asset: self.label().to_string(),
                reason: format!("cannot move from {} to {}", self.status, next),
            });
        }
        Ok(self.clone().with_status(next))
    }

    /// Name if present, otherwise id, otherwise a placeholder.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "<unnamed>"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_accepts_valid_record() {
        let asset = FixedAsset::new(
            "FA-001",
            date(2022, 1, 1),
            dec!(120_000_000),
            dec!(20_000_000),
            5,
            DepreciationMethod::StraightLine,
        )
        .unwrap();
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.depreciable_amount(), dec!(100_000_000));
    }

    #[test]
    fn test_zero_useful_life_rejected() {
        let err = FixedAsset::new(
            "FA-002",
            date(2022, 1, 1),
            dec!(1000),
            dec!(0),
            0,
            DepreciationMethod::StraightLine,
        )
        .unwrap_err();
        match err {
            ShopFinanceError::InvalidAsset { asset, .. } => assert_eq!(asset, "FA-002"),
            other => panic!("Expected InvalidAsset, got {other:?}"),
        }
    }

    #[test]
    fn test_salvage_above_price_rejected() {
        let result = FixedAsset::new(
            "FA-003",
            date(2022, 1, 1),
            dec!(1000),
            dec!(1500),
            3,
            DepreciationMethod::SumOfYears,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_units_of_production_falls_back_to_straight_line() {
        assert_eq!(
            DepreciationMethod::UnitsOfProduction.effective(),
            DepreciationMethod::StraightLine
        );
        assert_eq!(
            DepreciationMethod::DecliningBalance.effective(),
            DepreciationMethod::DecliningBalance
        );
    }

    #[test]
    fn test_method_parsing_accepts_aliases() {
        assert_eq!(
            "declining-balance".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::DecliningBalance
        );
        assert_eq!(
            "SYD".parse::<DepreciationMethod>().unwrap(),
            DepreciationMethod::SumOfYears
        );
        assert!("macrs".parse::<DepreciationMethod>().is_err());
    }

    #[test]
    fn test_status_lifecycle() {
        use AssetStatus::*;
        assert!(Active.can_transition_to(UnderMaintenance));
        assert!(UnderMaintenance.can_transition_to(Active));
        assert!(UnderMaintenance.can_transition_to(Sold));
        assert!(Active.can_transition_to(Disposed));
        assert!(!Sold.can_transition_to(Active));
        assert!(!Disposed.can_transition_to(Sold));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_transition_from_retired_fails() {
        let asset = FixedAsset::new(
            "FA-004",
            date(2020, 6, 1),
            dec!(500),
            dec!(50),
            4,
            DepreciationMethod::StraightLine,
        )
        .unwrap()
        .with_status(AssetStatus::Sold);
        assert!(asset.transition(AssetStatus::Active).is_err());
    }

    #[test]
    fn test_deserialize_defaults_status_and_id() {
        let asset: FixedAsset = serde_json::from_str(
            r#"{
                "purchase_date": "2023-04-01",
                "purchase_price": "9000",
                "salvage_value": "1000",
                "useful_life": 4,
                "depreciation_method": "units_of_production"
            }"#,
        )
        .unwrap();
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.label(), "<unnamed>");
        assert_eq!(
            asset.depreciation_method,
            DepreciationMethod::UnitsOfProduction
        );
    }
}
