use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Instant;

use yieldbook_core::investment::{self, InvestmentInput};
use yieldbook_core::portfolio::{self, Notification, PortfolioInput};
use yieldbook_core::time_value;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn analyse_investment(input_json: String) -> NapiResult<String> {
    let input: InvestmentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::analyse_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct InstallmentInput {
    principal: Decimal,
    rate: Decimal,
    years: Decimal,
}

#[napi]
pub fn monthly_installment(input_json: String) -> NapiResult<String> {
    let input: InstallmentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let start = Instant::now();
    let summary = time_value::loan_summary(input.principal, input.rate, input.years);
    let output = yieldbook_core::with_metadata(
        "Equated Monthly Installment (fixed-rate annuity)",
        &serde_json::json!({ "compounding": "monthly" }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        summary,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn summarise_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio::summarise_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn order_notifications(input_json: String) -> NapiResult<String> {
    let feed: Vec<Notification> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&portfolio::order_notifications(feed)).map_err(to_napi_error)
}
