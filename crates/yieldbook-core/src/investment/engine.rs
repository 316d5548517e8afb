use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::costs::{monthly_costs, total_for, upfront_costs, CostCategory, CostLineItem};
use super::input::{validate_input, InvestmentInput, PropertyStatus};
use crate::time_value::{monthly_installment, MONTHS_PER_YEAR};
use crate::types::{as_percent_of, percent_of, with_metadata, ComputationOutput, Currency, Money, Percent, Years};
use crate::YieldbookResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every figure derived from an [`InvestmentInput`].
///
/// Return metrics are percentages on a 0-100 scale. The cost sequences hold
/// only displayed items (see [`CostLineItem::is_displayed`]); totals are
/// computed over the full itemisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub project_name: String,
    pub developer: String,
    pub location: String,
    pub currency: Currency,

    // --- Financing ---
    pub purchase_price: Money,
    pub loan_amount: Money,
    pub down_payment: Money,
    pub monthly_emi: Money,

    // --- Rent ---
    pub gross_rent_year: Money,
    pub gross_rent_month: Money,

    // --- Upfront ---
    pub upfront_costs: Vec<CostLineItem>,
    /// Non-refundable costs due at acquisition
    pub upfront_expenses_total: Money,
    pub utility_deposit_amount: Money,
    /// Down payment + upfront expenses + refundable deposit
    pub total_cash_needed_upfront: Money,
    /// Purchase price + upfront expenses
    pub acquisition_cost: Money,

    // --- Monthly ---
    pub monthly_costs: Vec<CostLineItem>,
    pub total_monthly_recurring_expenses: Money,
    pub total_monthly_outflow: Money,
    pub monthly_net_cash_flow: Money,
    pub annual_net_cash_flow: Money,

    // --- Returns ---
    pub gross_roi_pp: Percent,
    pub gross_roi_ac: Percent,
    pub net_roi_excl_financing_pp: Percent,
    pub net_roi_excl_financing_ac: Percent,
    pub net_roi_incl_financing_pp: Percent,
    pub net_roi_incl_financing_ac: Percent,
    pub cash_on_cash_roi: Percent,
    /// Years of annual net cash flow needed to recover the acquisition cost;
    /// `None` when the annual net cash flow is not positive or the ratio
    /// cannot be represented.
    pub payback_period_years: Option<Years>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive financing, cost, cash-flow and return figures from validated input.
///
/// Pure and total: degenerate arithmetic resolves to 0 (rates) or `None`
/// (payback) instead of failing. Inputs within the [`validate_input`]
/// ceilings never overflow.
pub fn compute(input: &InvestmentInput) -> InvestmentResult {
    let months = Decimal::from(MONTHS_PER_YEAR);

    // --- Loan decomposition ---
    let purchase_price = input.purchase_price;
    let loan_amount = percent_of(purchase_price, input.ltv_percent);
    let down_payment = purchase_price - loan_amount;
    let monthly_emi = monthly_installment(
        loan_amount,
        input.annual_interest_rate_percent,
        input.loan_tenure_years,
    );
    let gross_rent_month = if input.gross_rent_year > Decimal::ZERO {
        input.gross_rent_year / months
    } else {
        Decimal::ZERO
    };

    // --- Upfront ---
    let upfront = upfront_costs(input, loan_amount);
    let upfront_expenses_total = total_for(&upfront, CostCategory::UpfrontDeductible);
    let utility_deposit_amount = input.utility_deposit;
    let total_cash_needed_upfront = down_payment + upfront_expenses_total + utility_deposit_amount;
    let acquisition_cost = purchase_price + upfront_expenses_total;

    // --- Monthly ---
    let monthly = monthly_costs(input, gross_rent_month);
    let total_monthly_recurring_expenses = total_for(&monthly, CostCategory::Monthly);

    // --- Cash flow ---
    let total_monthly_outflow = monthly_emi + total_monthly_recurring_expenses;
    let monthly_net_cash_flow = gross_rent_month - total_monthly_outflow;
    let annual_net_cash_flow = monthly_net_cash_flow * months;

    // --- Returns ---
    let net_operating_income = input.gross_rent_year - total_monthly_recurring_expenses * months;
    let payback_period_years = if annual_net_cash_flow > Decimal::ZERO {
        acquisition_cost.checked_div(annual_net_cash_flow)
    } else {
        None
    };

    debug!(
        %loan_amount,
        %monthly_emi,
        %upfront_expenses_total,
        %monthly_net_cash_flow,
        "investment computed"
    );

    InvestmentResult {
        project_name: input.project_name.clone(),
        developer: input.developer.clone(),
        location: input.location.clone(),
        currency: input.currency.clone(),
        purchase_price,
        loan_amount,
        down_payment,
        monthly_emi,
        gross_rent_year: input.gross_rent_year,
        gross_rent_month,
        upfront_costs: upfront.into_iter().filter(CostLineItem::is_displayed).collect(),
        upfront_expenses_total,
        utility_deposit_amount,
        total_cash_needed_upfront,
        acquisition_cost,
        monthly_costs: monthly.into_iter().filter(CostLineItem::is_displayed).collect(),
        total_monthly_recurring_expenses,
        total_monthly_outflow,
        monthly_net_cash_flow,
        annual_net_cash_flow,
        gross_roi_pp: as_percent_of(input.gross_rent_year, purchase_price),
        gross_roi_ac: as_percent_of(input.gross_rent_year, acquisition_cost),
        net_roi_excl_financing_pp: as_percent_of(net_operating_income, purchase_price),
        net_roi_excl_financing_ac: as_percent_of(net_operating_income, acquisition_cost),
        net_roi_incl_financing_pp: as_percent_of(annual_net_cash_flow, purchase_price),
        net_roi_incl_financing_ac: as_percent_of(annual_net_cash_flow, acquisition_cost),
        cash_on_cash_roi: as_percent_of(annual_net_cash_flow, total_cash_needed_upfront),
        payback_period_years,
    }
}

/// Validate, compute and wrap the result with advisory warnings.
///
/// Offplan handover years are checked against the current UTC year.
pub fn analyse_investment(
    input: &InvestmentInput,
) -> YieldbookResult<ComputationOutput<InvestmentResult>> {
    analyse_investment_as_of(input, chrono::Utc::now().year())
}

/// [`analyse_investment`] with an explicit reference year.
pub fn analyse_investment_as_of(
    input: &InvestmentInput,
    current_year: i32,
) -> YieldbookResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();

    validate_input(input, current_year)?;

    let result = compute(input);
    let warnings = collect_warnings(input, &result);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Property Investment Analysis (EMI amortisation, itemised costs, yield on PP and AC)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(input: &InvestmentInput, result: &InvestmentResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if result.monthly_net_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Monthly net cash flow of {:.2} is negative: rent does not cover EMI and running costs",
            result.monthly_net_cash_flow
        ));
    }

    if result.payback_period_years.is_none() {
        warnings.push("Annual net cash flow is not positive, payback period is N/A".into());
    }

    if input.ltv_percent > dec!(80) {
        warnings.push(format!(
            "LTV of {}% exceeds 80%, high leverage",
            input.ltv_percent.normalize()
        ));
    }

    if input.status == PropertyStatus::Offplan && input.gross_rent_year.is_zero() {
        if let Some(year) = input.handover_year {
            warnings.push(format!(
                "Off-plan unit earns no rent until handover in {year}; income metrics are zero"
            ));
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Two-bedroom apartment, 50% financed
    fn sample_input() -> InvestmentInput {
        InvestmentInput {
            project_name: "Marina Heights".into(),
            developer: "Emaar".into(),
            location: "Dubai Marina".into(),
            bed_bath: "2B/2B".into(),
            sqft: dec!(1100),
            purchase_price: dec!(1000000),
            ltv_percent: dec!(50),
            loan_tenure_years: dec!(10),
            annual_interest_rate_percent: dec!(5),
            gross_rent_year: dec!(120000),
            dld_percent: dec!(4),
            mortgage_reg_percent: dec!(0.25),
            mortgage_reg_fixed: dec!(290),
            trustee_fee: dec!(4200),
            utility_deposit: dec!(2000),
            service_charge_monthly: dec!(1000),
            mgmt_percent_rent: dec!(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_loan_decomposition() {
        let result = compute(&sample_input());
        assert_eq!(result.loan_amount, dec!(500000));
        assert_eq!(result.down_payment, dec!(500000));
        assert_eq!(result.gross_rent_month, dec!(10000));
        assert!((result.monthly_emi - dec!(5303.28)).abs() < dec!(0.01));
    }

    #[test]
    fn test_upfront_totals() {
        let result = compute(&sample_input());
        // 40,000 DLD + 1,540 mortgage registration + 4,200 trustee
        assert_eq!(result.upfront_expenses_total, dec!(45740));
        assert_eq!(result.acquisition_cost, dec!(1045740));
        assert_eq!(result.total_cash_needed_upfront, dec!(547740));
    }

    #[test]
    fn test_monthly_totals() {
        let result = compute(&sample_input());
        // 1,000 service charge + 5% of 10,000 rent
        assert_eq!(result.total_monthly_recurring_expenses, dec!(1500));
        assert_eq!(
            result.total_monthly_outflow,
            result.monthly_emi + dec!(1500)
        );
        assert_eq!(result.monthly_costs.len(), 2);
    }

    #[test]
    fn test_return_metrics() {
        let result = compute(&sample_input());
        assert_eq!(result.gross_roi_pp, dec!(12));
        // (120,000 - 18,000) / 1,000,000
        assert_eq!(result.net_roi_excl_financing_pp, dec!(10.2));
        assert!(result.gross_roi_ac < result.gross_roi_pp);
        assert_eq!(
            result.net_roi_incl_financing_pp,
            result.annual_net_cash_flow / dec!(1000000) * dec!(100)
        );
        let payback = result.payback_period_years.unwrap();
        assert_eq!(payback, result.acquisition_cost / result.annual_net_cash_flow);
    }

    #[test]
    fn test_negative_cash_flow_has_no_payback() {
        let mut input = sample_input();
        input.gross_rent_year = dec!(30000);
        let result = compute(&input);
        assert!(result.annual_net_cash_flow < Decimal::ZERO);
        assert!(result.payback_period_years.is_none());
        assert!(result.cash_on_cash_roi < Decimal::ZERO);
    }

    #[test]
    fn test_analyse_rejects_invalid_input() {
        let mut input = sample_input();
        input.purchase_price = Decimal::ZERO;
        assert!(analyse_investment_as_of(&input, 2026).is_err());
    }

    #[test]
    fn test_analyse_warnings() {
        let mut input = sample_input();
        input.ltv_percent = dec!(85);
        input.gross_rent_year = dec!(20000);
        let output = analyse_investment_as_of(&input, 2026).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("negative")));
        assert!(output.warnings.iter().any(|w| w.contains("N/A")));
        assert!(output.warnings.iter().any(|w| w.contains("LTV of 85%")));
    }

    #[test]
    fn test_analyse_offplan_without_rent() {
        let mut input = sample_input();
        input.status = PropertyStatus::Offplan;
        input.handover_year = Some(2028);
        input.gross_rent_year = Decimal::ZERO;
        let output = analyse_investment_as_of(&input, 2026).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("handover in 2028")));
        assert_eq!(output.result.gross_roi_pp, Decimal::ZERO);
    }

    #[test]
    fn test_methodology_string() {
        let output = analyse_investment_as_of(&sample_input(), 2026).unwrap();
        assert!(output.methodology.contains("Property Investment Analysis"));
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_oversized_price_is_rejected_not_panicking() {
        let input = InvestmentInput {
            sqft: dec!(1000),
            purchase_price: Decimal::from_i128_with_scale(10_i128.pow(27), 0),
            ltv_percent: dec!(100),
            loan_tenure_years: dec!(10),
            ..Default::default()
        };
        let result = compute(&input);
        assert_eq!(result.loan_amount, input.purchase_price);
        assert_eq!(result.down_payment, Decimal::ZERO);

        match analyse_investment_as_of(&input, 2026) {
            Err(crate::YieldbookError::InvalidInput { field, .. }) => {
                assert_eq!(field, "purchase_price")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_input_at_ceilings_computes() {
        use crate::investment::input::{MAX_AMOUNT, MAX_PERCENT};

        let input = InvestmentInput {
            sqft: dec!(1000),
            purchase_price: MAX_AMOUNT,
            ltv_percent: dec!(100),
            loan_tenure_years: dec!(30),
            annual_interest_rate_percent: MAX_PERCENT,
            gross_rent_year: MAX_AMOUNT,
            dld_percent: MAX_PERCENT,
            agency_fee_percent: MAX_PERCENT,
            vat_percent: MAX_PERCENT,
            furnishing_cost: MAX_AMOUNT,
            utility_deposit: MAX_AMOUNT,
            service_charge_monthly: MAX_AMOUNT,
            capex_percent_rent: MAX_PERCENT,
            cash_reserves_percent_rent: MAX_PERCENT,
            ..Default::default()
        };
        let output = analyse_investment_as_of(&input, 2026).unwrap();
        assert!(output.result.acquisition_cost > MAX_AMOUNT);
        assert_eq!(output.result.payback_period_years, None);
    }

    #[test]
    fn test_fractional_tenure_flows_through() {
        let mut input = sample_input();
        input.loan_tenure_years = dec!(12.75);
        let result = compute(&input);
        assert_eq!(
            result.monthly_emi,
            monthly_installment(result.loan_amount, input.annual_interest_rate_percent, dec!(12.75))
        );
        assert!(result.monthly_emi < compute(&sample_input()).monthly_emi);
    }
}
