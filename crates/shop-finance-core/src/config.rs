//! Engine settings.
//!
//! Every knob defaults to the constant the reports have always used, so an
//! empty (or partial) YAML/JSON document deserialises into a working config.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;
use crate::{ShopFinanceError, ShopFinanceResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast: ForecastSettings,
    pub ratios: RatioSettings,
}

impl EngineConfig {
    pub fn validate(&self) -> ShopFinanceResult<()> {
        self.forecast.validate()?;
        self.ratios.validate()
    }
}

/// Tuning for pattern extraction and confidence tiering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Entries compared at each end of a subcategory history for growth.
    pub growth_window: usize,
    /// Growth is clamped to `[-growth_clamp, growth_clamp]`.
    pub growth_clamp: Rate,
    pub min_confidence: Rate,
    pub max_confidence: Rate,
    /// Average confidence strictly above this is `high`.
    pub high_threshold: Rate,
    /// Average confidence strictly above this (and not high) is `medium`.
    pub medium_threshold: Rate,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            growth_window: 6,
            growth_clamp: dec!(0.5),
            min_confidence: dec!(0.3),
            max_confidence: dec!(0.95),
            high_threshold: dec!(0.8),
            medium_threshold: dec!(0.6),
        }
    }
}

impl ForecastSettings {
    pub fn validate(&self) -> ShopFinanceResult<()> {
        if self.growth_window == 0 {
            return Err(ShopFinanceError::Config(
                "forecast.growth_window must be at least 1".into(),
            ));
        }
        if self.growth_clamp < Decimal::ZERO {
            return Err(ShopFinanceError::Config(
                "forecast.growth_clamp cannot be negative".into(),
            ));
        }
        if self.min_confidence < Decimal::ZERO
            || self.max_confidence > Decimal::ONE
            || self.min_confidence > self.max_confidence
        {
            return Err(ShopFinanceError::Config(format!(
                "forecast confidence bounds must satisfy 0 <= min ({}) <= max ({}) <= 1",
                self.min_confidence, self.max_confidence
            )));
        }
        if self.medium_threshold > self.high_threshold {
            return Err(ShopFinanceError::Config(format!(
                "forecast.medium_threshold ({}) exceeds high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

/// Ledger conventions the ratio calculator relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioSettings {
    /// Operating subcategory holding cost-of-goods-sold outflows.
    pub cogs_subcategory: String,
    /// Financing subcategory holding interest payments.
    pub interest_subcategory: String,
    /// No receivables ledger is modelled; this fixed figure is reported.
    pub receivables_turnover: Decimal,
}

impl Default for RatioSettings {
    fn default() -> Self {
        Self {
            cogs_subcategory: "cost_of_goods_sold".into(),
            interest_subcategory: "interest_expense".into(),
            receivables_turnover: dec!(12),
        }
    }
}

impl RatioSettings {
    pub fn validate(&self) -> ShopFinanceResult<()> {
        if self.cogs_subcategory.trim().is_empty() {
            return Err(ShopFinanceError::Config(
                "ratios.cogs_subcategory cannot be empty".into(),
            ));
        }
        if self.interest_subcategory.trim().is_empty() {
            return Err(ShopFinanceError::Config(
                "ratios.interest_subcategory cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
