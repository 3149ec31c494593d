use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 2.0x current ratio)
pub type Multiple = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Cash-flow statement section a movement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowCategory {
    Operating,
    Investing,
    Financing,
}

impl std::fmt::Display for CashFlowCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Operating => "operating",
            Self::Investing => "investing",
            Self::Financing => "financing",
        };
        write!(f, "{}", s)
    }
}

/// One recorded cash movement. Positive amounts are inflows, negative outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub date: NaiveDate,
    pub category: CashFlowCategory,
    /// Free-form bucket, e.g. "rent", "sales", "cost_of_goods_sold"
    pub subcategory: String,
    pub amount: Money,
}

impl CashFlowEntry {
    pub fn new(
        date: NaiveDate,
        category: CashFlowCategory,
        subcategory: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            date,
            category,
            subcategory: subcategory.into(),
            amount,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&CashFlowCategory::Financing).unwrap();
        assert_eq!(json, "\"financing\"");
    }

    #[test]
    fn test_entry_deserializes_from_record() {
        let entry: CashFlowEntry = serde_json::from_str(
            r#"{"date":"2024-03-01","category":"operating","subcategory":"rent","amount":"-1500000"}"#,
        )
        .unwrap();
        assert_eq!(entry.subcategory, "rent");
        assert_eq!(entry.amount, dec!(-1500000));
        assert!(!entry.is_inflow());
    }

    #[test]
    fn test_metadata_envelope() {
        let out = with_metadata("test", &serde_json::json!({}), vec![], 7, dec!(1));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.result, dec!(1));
    }
}
