use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use yieldbook_core::ValueTone;

use super::format_field;

/// Headline figures, in priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "cash_on_cash_roi",
    "monthly_net_cash_flow",
    "monthly_installment",
    "pnl",
];

/// Print just the headline value of the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field of the result object.
/// Signed headline figures are coloured by tone.
pub fn print_minimal(value: &Value) {
    let line = minimal_line(value);
    match headline_tone(value) {
        Some(ValueTone::Positive) => println!("{}", line.green()),
        Some(ValueTone::Negative) => println!("{}", line.red()),
        _ => println!("{line}"),
    }
}

fn headline_tone(value: &Value) -> Option<ValueTone> {
    let result = value.get("result")?;
    let raw = ["monthly_net_cash_flow", "pnl"]
        .iter()
        .find_map(|key| result.get(*key))?;
    let amount = match raw {
        Value::String(s) => Decimal::from_str(s).ok()?,
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok()?,
        _ => return None,
    };
    Some(ValueTone::of(amount))
}

fn minimal_line(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return format!("{key}: {}", format_field(key, val));
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{key}: {}", format_field(key, val));
        }
    }

    if let Value::Array(items) = result {
        return format!("{} rows", items.len());
    }

    format_field("", result)
}
