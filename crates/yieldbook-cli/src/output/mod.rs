pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Fields rendered as percentages in human-facing formats.
pub(crate) fn is_percent_key(key: &str) -> bool {
    key.contains("roi") || key.ends_with("_percent") || key.ends_with("(%)")
}

/// Fields rendered as plain text, never grouped.
fn is_plain_key(key: &str) -> bool {
    matches!(key, "years" | "handover_year" | "holdings_count" | "Qty" | "Ticker")
}

/// Render a decimal string with two places and thousands separators.
pub(crate) fn format_amount(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.')?;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    Some(format!("{sign}{grouped}.{frac}"))
}

/// Human-facing rendering of a scalar field.
pub(crate) fn format_field(key: &str, value: &Value) -> String {
    let raw = match value {
        Value::Null => return "N/A".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => return b.to_string(),
        _ => return serde_json::to_string(value).unwrap_or_default(),
    };

    if is_plain_key(key) {
        return raw;
    }
    match format_amount(&raw) {
        Some(amount) if is_percent_key(key) => format!("{amount}%"),
        Some(amount) => amount,
        None => raw,
    }
}
