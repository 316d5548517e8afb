use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use yieldbook_core::portfolio::holdings::{self, HoldingColumn, SortDirection};
use yieldbook_core::portfolio::{self, Notification, PortfolioInput};

use crate::input;

/// Arguments for the portfolio summary
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON or YAML input file (`{"holdings": [...]}` or a bare holdings array)
    #[arg(long)]
    pub input: Option<String>,

    /// Capital base used for the cash position (overrides the input file)
    #[arg(long)]
    pub capital: Option<Decimal>,
}

/// Arguments for the sorted holdings table
#[derive(Args)]
pub struct HoldingsArgs {
    /// Path to JSON or YAML holdings feed
    #[arg(long)]
    pub input: Option<String>,

    /// Column to sort by
    #[arg(long, value_enum)]
    pub sort: Option<SortColumn>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub descending: bool,
}

/// Arguments for the notifications feed
#[derive(Args)]
pub struct NotificationsArgs {
    /// Path to JSON or YAML notifications feed
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Ticker,
    Qty,
    AvgBuyPrice,
    BuyValue,
    Ltp,
    PresentValue,
    Pnl,
    DayChange,
    Allocation,
}

impl From<SortColumn> for HoldingColumn {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Ticker => HoldingColumn::Ticker,
            SortColumn::Qty => HoldingColumn::Qty,
            SortColumn::AvgBuyPrice => HoldingColumn::AvgBuyPrice,
            SortColumn::BuyValue => HoldingColumn::BuyValue,
            SortColumn::Ltp => HoldingColumn::Ltp,
            SortColumn::PresentValue => HoldingColumn::PresentValue,
            SortColumn::Pnl => HoldingColumn::PnlPercent,
            SortColumn::DayChange => HoldingColumn::PriceChange1d,
            SortColumn::Allocation => HoldingColumn::Allocation,
        }
    }
}

/// A portfolio input given either as the full object or as the bare feed.
fn portfolio_input(raw: Value) -> Result<PortfolioInput, Box<dyn std::error::Error>> {
    let raw = if raw.is_array() {
        serde_json::json!({ "holdings": raw })
    } else {
        raw
    };
    Ok(serde_json::from_value(raw)?)
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = input::load(args.input.as_deref(), "portfolio summary")?;
    let mut portfolio_input = portfolio_input(raw)?;
    if let Some(capital) = args.capital {
        portfolio_input.capital_base = capital;
    }
    let output = portfolio::summarise_portfolio(&portfolio_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_holdings(args: HoldingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = input::load(args.input.as_deref(), "holdings table")?;
    let mut feed = portfolio_input(raw)?.holdings;
    if let Some(column) = args.sort {
        let direction = if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        holdings::sort_holdings(&mut feed, column.into(), direction);
    }
    Ok(serde_json::to_value(feed)?)
}

pub fn run_notifications(args: NotificationsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let feed: Vec<Notification> = input::load(args.input.as_deref(), "notifications feed")?;
    let ordered = portfolio::order_notifications(feed);
    Ok(serde_json::to_value(ordered)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(ticker: &str) -> Value {
        json!({
            "Ticker": ticker, "Qty": "10", "Avg Buy Price (P/S)": "100", "Buy Value": "1000",
            "LTP": "110", "Present Value": "1100", "P&L (%)": "10", "Price Change (1D)": "0.5",
            "Allocation (%)": "100"
        })
    }

    #[test]
    fn test_bare_feed_uses_defaults() {
        let input = portfolio_input(json!([row("AAPL")])).unwrap();
        assert_eq!(input.holdings.len(), 1);
        assert_eq!(input.capital_base, dec!(1000000));
    }

    #[test]
    fn test_object_input_keeps_capital() {
        let input =
            portfolio_input(json!({ "holdings": [row("MSFT")], "capital_base": 250000 })).unwrap();
        assert_eq!(input.capital_base, dec!(250000));
        assert_eq!(input.holdings[0].ticker, "MSFT");
    }
}
