use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0-100 scale (5 = 5%). Never as fractions.
pub type Percent = Decimal;

/// Year counts (loan tenure, payback period)
pub type Years = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    AED,
    USD,
    GBP,
    EUR,
    INR,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::AED => "AED",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::EUR => "EUR",
            Currency::INR => "INR",
            Currency::Other(code) => code,
        }
    }
}

/// Sign classification a renderer uses to colour a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTone {
    Positive,
    Negative,
    Neutral,
}

impl ValueTone {
    pub fn of(value: Decimal) -> Self {
        if value > Decimal::ZERO {
            ValueTone::Positive
        } else if value < Decimal::ZERO {
            ValueTone::Negative
        } else {
            ValueTone::Neutral
        }
    }
}

/// `pct` percent of `base` (percent_of(200, 5) = 10); 0 when the result
/// cannot be represented.
pub fn percent_of(base: Money, pct: Percent) -> Money {
    base.checked_mul(pct)
        .map(|v| v / Decimal::ONE_HUNDRED)
        .or_else(|| (base / Decimal::ONE_HUNDRED).checked_mul(pct))
        .unwrap_or_else(|| {
            warn!(%base, %pct, "percentage overflowed, set to zero");
            Decimal::ZERO
        })
}

/// `part` as a percentage of `whole`; 0 when `whole` is zero or the ratio
/// cannot be represented.
pub fn as_percent_of(part: Decimal, whole: Decimal) -> Percent {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            warn!(%part, %whole, "ratio overflowed, set to zero");
            Decimal::ZERO
        })
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
