use serde_json::{Map, Value};
use std::io;

use super::{is_record_list, plain};

/// Write the report as CSV to stdout.
///
/// A result carrying a record list (depreciation schedule, register
/// valuations, forecast months) is written as that list; anything else is a
/// two-column `field,value` dump of the scalar fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match primary_records(map) {
            Some(records) => write_records(&mut wtr, records),
            None => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([plain(other, "")]);
        }
    }

    let _ = wtr.flush();
}

/// The list a spreadsheet user most likely wants from each report.
fn primary_records(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    ["schedule", "valuations", "monthly"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_record_list(v))
        .and_then(Value::as_array)
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        if is_record_list(val) {
            continue;
        }
        let _ = wtr.write_record([key.as_str(), &plain(val, "")]);
    }
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([plain(item, "")]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| plain(v, "")).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        match value {
            Value::Object(map) => match primary_records(map) {
                Some(records) => write_records(&mut wtr, records),
                None => write_fields(&mut wtr, map),
            },
            _ => unreachable!(),
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_written_as_rows() {
        let result = json!({
            "book_value": "80",
            "schedule": [
                {"year": 1, "depreciation": "20"},
                {"year": 2, "depreciation": "20"}
            ]
        });
        // object keys come out in sorted order
        assert_eq!(render(&result), "depreciation,year\n20,1\n20,2\n");
    }

    #[test]
    fn test_ratios_written_as_fields() {
        let result = json!({"current_ratio": "2", "quick_ratio": "0.6"});
        assert_eq!(render(&result), "field,value\ncurrent_ratio,2\nquick_ratio,0.6\n");
    }
}
