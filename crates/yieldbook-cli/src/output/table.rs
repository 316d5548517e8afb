use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_field;

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go into a Field/Value table. Arrays of
/// objects (cost line items, allocation slices) get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{value}"),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{other}"),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_object(map: &Map<String, Value>) {
    println!("{}", scalar_table(map));

    for (key, val) in map {
        if let Value::Array(items) = val {
            if items.iter().any(Value::is_object) {
                println!("\n{}:", title(key));
                print_array_table(items);
            }
        }
    }
}

fn scalar_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => continue,
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(|v| format_field(key, v)).collect();
                builder.push_record([key.clone(), joined.join(", ")]);
            }
            _ => builder.push_record([key.clone(), format_field(key, val)]),
        }
    }
    builder.build()
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(|v| format_field(h, v)).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }

        println!("{}", builder.build());
    } else {
        for item in arr {
            println!("{}", format_field("", item));
        }
    }
}

fn title(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title() {
        assert_eq!(title("upfront_costs"), "Upfront Costs");
        assert_eq!(title("allocations"), "Allocations");
    }

    #[test]
    fn test_scalar_table_skips_nested_rows() {
        let value = json!({
            "monthly_emi": "5303.2757",
            "payback_period_years": null,
            "upfront_costs": [{"label": "DLD Fee", "amount": "100000"}]
        });
        let rendered = scalar_table(value.as_object().unwrap()).to_string();
        assert!(rendered.contains("5,303.28"));
        assert!(rendered.contains("N/A"));
        assert!(!rendered.contains("DLD Fee"));
    }
}
