use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Instant;

use crate::error::YieldbookError;
use crate::types::{as_percent_of, with_metadata, ComputationOutput, Currency, Money, Percent, ValueTone};
use crate::YieldbookResult;

/// Chart colours assigned to allocation slices, cycled by position.
pub const ALLOCATION_PALETTE: [&str; 20] = [
    "#003366", "#004488", "#0055AA", "#0066CC", "#0077EE", "#0088FF", "#1199FF", "#22AAFF",
    "#33BBFF", "#44CCFF", "#003F5C", "#2F4B7C", "#665191", "#A05195", "#D45087", "#FF5733",
    "#FF7F50", "#FFA07A", "#FFD700", "#4CAF50",
];

pub const DEFAULT_CAPITAL_BASE: Money = dec!(1000000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the spreadsheet-backed holdings feed.
///
/// The feed is hand-maintained: numeric cells may be numbers, numeric
/// strings ("$1,250.00", "12.5%") or blank. Anything unparsable counts as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(rename = "Ticker", default = "unknown_ticker", deserialize_with = "lenient_ticker")]
    pub ticker: String,
    #[serde(rename = "Qty", default, deserialize_with = "lenient_decimal")]
    pub qty: Decimal,
    #[serde(rename = "Avg Buy Price (P/S)", default, deserialize_with = "lenient_decimal")]
    pub avg_buy_price: Money,
    #[serde(rename = "Buy Value", default, deserialize_with = "lenient_decimal")]
    pub buy_value: Money,
    /// Last traded price
    #[serde(rename = "LTP", default, deserialize_with = "lenient_decimal")]
    pub ltp: Money,
    #[serde(rename = "Present Value", default, deserialize_with = "lenient_decimal")]
    pub present_value: Money,
    #[serde(rename = "P&L (%)", default, deserialize_with = "lenient_decimal")]
    pub pnl_percent: Percent,
    #[serde(rename = "Price Change (1D)", default, deserialize_with = "lenient_decimal")]
    pub price_change_1d: Percent,
    #[serde(rename = "Allocation (%)", default, deserialize_with = "lenient_decimal")]
    pub allocation_percent: Percent,
}

impl Holding {
    pub fn unrealised_pnl(&self) -> Money {
        self.present_value - self.buy_value
    }
}

/// Holdings feed plus the capital it is measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub holdings: Vec<Holding>,
    /// Total capital committed to the portfolio; uninvested capital is cash
    #[serde(default = "default_capital_base")]
    pub capital_base: Money,
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

/// One slice of the allocation doughnut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub ticker: String,
    pub allocation_percent: Percent,
    pub color: String,
}

/// Dashboard summary figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub currency: Currency,
    pub holdings_count: usize,
    pub total_invested: Money,
    pub total_current: Money,
    pub pnl: Money,
    /// P&L as a percentage of the amount invested
    pub pnl_percent: Percent,
    pub pnl_tone: ValueTone,
    pub capital_base: Money,
    pub cash_position: Money,
    pub invested_share_percent: Percent,
    pub cash_share_percent: Percent,
    pub allocations: Vec<AllocationSlice>,
}

/// Sortable columns of the holdings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingColumn {
    Ticker,
    Qty,
    AvgBuyPrice,
    BuyValue,
    Ltp,
    PresentValue,
    PnlPercent,
    PriceChange1d,
    Allocation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Totals, P&L, cash position and allocation slices for the dashboard.
pub fn summarise_portfolio(
    input: &PortfolioInput,
) -> YieldbookResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.holdings.is_empty() {
        return Err(YieldbookError::InsufficientData(
            "Portfolio feed contains no holdings".into(),
        ));
    }

    if input.capital_base < Decimal::ZERO {
        return Err(YieldbookError::invalid(
            "capital_base",
            "Capital base cannot be negative",
        ));
    }

    let total_invested: Money = input.holdings.iter().map(|h| h.buy_value).sum();
    let total_current: Money = input.holdings.iter().map(|h| h.present_value).sum();
    let pnl = total_current - total_invested;
    let cash_position = input.capital_base - total_invested;

    let allocations: Vec<AllocationSlice> = input
        .holdings
        .iter()
        .enumerate()
        .map(|(i, h)| AllocationSlice {
            ticker: h.ticker.clone(),
            allocation_percent: h.allocation_percent,
            color: ALLOCATION_PALETTE[i % ALLOCATION_PALETTE.len()].to_string(),
        })
        .collect();

    if cash_position < Decimal::ZERO {
        warnings.push(format!(
            "Invested amount {total_invested:.2} exceeds the capital base {:.2}",
            input.capital_base
        ));
    }

    let allocated: Percent = allocations.iter().map(|a| a.allocation_percent).sum();
    if (allocated - Decimal::ONE_HUNDRED).abs() > dec!(0.5) {
        warnings.push(format!(
            "Allocations sum to {:.2}%, not 100%",
            allocated
        ));
    }

    let output = PortfolioSummary {
        currency: input.currency.clone(),
        holdings_count: input.holdings.len(),
        total_invested,
        total_current,
        pnl,
        pnl_percent: as_percent_of(pnl, total_invested),
        pnl_tone: ValueTone::of(pnl),
        capital_base: input.capital_base,
        cash_position,
        invested_share_percent: as_percent_of(total_invested, input.capital_base),
        cash_share_percent: as_percent_of(cash_position, input.capital_base),
        allocations,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Portfolio Summary (buy value vs present value against capital base)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Stable sort of the holdings table by one column.
pub fn sort_holdings(holdings: &mut [Holding], column: HoldingColumn, direction: SortDirection) {
    holdings.sort_by(|a, b| {
        let ord = compare_by(a, b, column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare_by(a: &Holding, b: &Holding, column: HoldingColumn) -> Ordering {
    match column {
        HoldingColumn::Ticker => a.ticker.to_lowercase().cmp(&b.ticker.to_lowercase()),
        HoldingColumn::Qty => a.qty.cmp(&b.qty),
        HoldingColumn::AvgBuyPrice => a.avg_buy_price.cmp(&b.avg_buy_price),
        HoldingColumn::BuyValue => a.buy_value.cmp(&b.buy_value),
        HoldingColumn::Ltp => a.ltp.cmp(&b.ltp),
        HoldingColumn::PresentValue => a.present_value.cmp(&b.present_value),
        HoldingColumn::PnlPercent => a.pnl_percent.cmp(&b.pnl_percent),
        HoldingColumn::PriceChange1d => a.price_change_1d.cmp(&b.price_change_1d),
        HoldingColumn::Allocation => a.allocation_percent.cmp(&b.allocation_percent),
    }
}

// ---------------------------------------------------------------------------
// Feed parsing
// ---------------------------------------------------------------------------

fn default_capital_base() -> Money {
    DEFAULT_CAPITAL_BASE
}

fn default_currency() -> Currency {
    Currency::USD
}

fn unknown_ticker() -> String {
    "Unknown".to_string()
}

/// Parse a spreadsheet cell into a decimal, ignoring currency symbols,
/// thousands separators and percent signs. Unparsable cells are `None`.
pub fn parse_cell(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => parse_cell(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_cell(&s),
        _ => None,
    }
    .unwrap_or(Decimal::ZERO))
}

fn lenient_ticker<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => unknown_ticker(),
    })
}
