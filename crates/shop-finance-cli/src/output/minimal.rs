use serde_json::Value;

use super::plain;

/// Headline figure of each report, in lookup order.
const HEADLINE_KEYS: [&str; 6] = [
    "book_value",
    "total_book_value",
    "current_ratio",
    "net_cash_flow",
    "confidence",
    "accumulated_depreciation",
];

/// Print just the headline figure of the report.
///
/// Falls back to the first scalar field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    println!("{}", headline(result_obj));
}

fn headline(result: &Value) -> String {
    let Value::Object(map) = result else {
        return plain(result, "null");
    };

    for key in HEADLINE_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return plain(val, "null");
        }
    }

    map.iter()
        .find(|(_, v)| !v.is_array() && !v.is_object())
        .map(|(key, val)| format!("{}: {}", key, plain(val, "null")))
        .unwrap_or_default()
}
