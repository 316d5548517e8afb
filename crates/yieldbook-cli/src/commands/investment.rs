use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use yieldbook_core::investment::{self, InvestmentInput};
use yieldbook_core::time_value;
use yieldbook_core::with_metadata;

use crate::input;

/// Arguments for a property investment analysis
#[derive(Args)]
pub struct InvestmentArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Reference year for the offplan handover check (defaults to the current year)
    #[arg(long)]
    pub as_of_year: Option<i32>,
}

/// Arguments for a standalone installment calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (5 = 5% p.a.)
    #[arg(long)]
    pub rate: Decimal,

    /// Tenure in years (fractions allowed, e.g. 2.5)
    #[arg(long)]
    pub years: Decimal,
}

pub fn run_investment(args: InvestmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let unit: InvestmentInput = input::load(args.input.as_deref(), "investment analysis")?;
    let output = match args.as_of_year {
        Some(year) => investment::analyse_investment_as_of(&unit, year)?,
        None => investment::analyse_investment(&unit)?,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.principal < Decimal::ZERO {
        return Err("--principal must be non-negative".into());
    }
    let start = Instant::now();
    let summary = time_value::loan_summary(args.principal, args.rate, args.years);

    let mut warnings = Vec::new();
    if summary.monthly_installment.is_zero()
        && !args.principal.is_zero()
        && args.years > Decimal::ZERO
    {
        warnings.push("Installment could not be computed for these terms, reported as 0".into());
    }

    let output = with_metadata(
        "Equated Monthly Installment (fixed-rate annuity)",
        &json!({
            "compounding": "monthly",
            "periods": args.years.checked_mul(Decimal::from(time_value::MONTHS_PER_YEAR)),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        summary,
    );
    Ok(serde_json::to_value(output)?)
}
