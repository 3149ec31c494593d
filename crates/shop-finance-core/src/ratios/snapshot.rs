use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Point-in-time balance-sheet summary supplied by the back office.
///
/// The engine never assembles this from ledgers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalSnapshot {
    // Equity components
    pub share_capital: Money,
    pub retained_earnings: Money,
    // Debt components
    pub short_term_debt: Money,
    pub long_term_debt: Money,

    pub total_assets: Money,
    pub total_liabilities: Money,
    pub current_liabilities: Money,
    pub cash_equivalent: Money,
    pub working_capital: Money,
    /// APPROXIMATION: the back office has no current-asset ledger and reports
    /// `inventory_value + retained_earnings` here (see
    /// [`CapitalSnapshot::approximate_current_assets`]). Kept as its own field
    /// so a real current-assets figure can replace it without changing how
    /// the ratios read it.
    pub current_assets_approx: Money,
}

impl CapitalSnapshot {
    /// The stand-in the back office uses for current assets.
    pub fn approximate_current_assets(inventory_value: Money, retained_earnings: Money) -> Money {
        inventory_value + retained_earnings
    }

    /// Fill `current_assets_approx` from inventory and retained earnings.
    pub fn with_approximate_current_assets(mut self, inventory_value: Money) -> Self {
        self.current_assets_approx =
            Self::approximate_current_assets(inventory_value, self.retained_earnings);
        self
    }

    /// Assets less liabilities; may be negative.
    pub fn total_equity(&self) -> Money {
        self.total_assets - self.total_liabilities
    }

    pub fn total_debt(&self) -> Money {
        self.short_term_debt + self.long_term_debt
    }

    pub fn has_negative_equity(&self) -> bool {
        self.total_equity() < Decimal::ZERO
    }
}
