//! Property-based tests for the investment engine.
//!
//! Invariants verified for arbitrary in-domain inputs:
//! - `compute` is pure
//! - down payment + loan amount reconstruct the purchase price exactly
//! - outflow and annual cash flow identities hold exactly
//! - a zero rate amortises linearly
//! - payback is available exactly when annual net cash flow is positive
//! - no line item carries a negative amount
//! - refundable and future costs stay out of the upfront expense total

use proptest::prelude::*;
use rust_decimal::Decimal;
use yieldbook_core::investment::{compute, validate_input, CostCategory, InvestmentInput};

/// Whole-currency amounts in [lo, hi].
fn money(lo: u64, hi: u64) -> impl Strategy<Value = Decimal> {
    (lo..=hi).prop_map(Decimal::from)
}

/// Percentages with two decimal places in [0, max].
fn percent(max: u32) -> impl Strategy<Value = Decimal> {
    (0..=max * 100).prop_map(|bp| Decimal::new(i64::from(bp), 2))
}

/// Loan tenures in tenths of a year in [1, 35]; most are not whole months.
fn tenure() -> impl Strategy<Value = Decimal> {
    (10u32..=350).prop_map(|tenths| Decimal::new(i64::from(tenths), 1))
}

fn input_strat() -> impl Strategy<Value = InvestmentInput> {
    (
        (money(1, 20_000_000), 0u32..=100, tenure(), percent(15), money(0, 2_000_000)),
        (percent(5), percent(2), money(0, 5_000), percent(2), percent(5), percent(10)),
        (money(0, 10_000), money(0, 10_000), money(0, 5_000), money(0, 5_000)),
        (money(0, 10_000), money(0, 100_000), money(0, 10_000), money(0, 5_000)),
        (money(0, 5_000), money(0, 2_000), money(0, 1_500), money(0, 1_000)),
        (percent(10), percent(10), percent(10), percent(10), percent(10), percent(10)),
    )
        .prop_map(|(acq, fees, fixed, deposits, monthly, allocations)| {
            let (purchase_price, ltv, tenure, rate, rent) = acq;
            let (dld, reg_pct, reg_fixed, bank, agency, vat) = fees;
            let (title_deed, trustee, valuation, inspection) = fixed;
            let (conveyance, furnishing, deposit, release) = deposits;
            let (service, insurance, utilities, cleaning) = monthly;
            let (capex, rm, mgmt, vacancy, refinance, reserves) = allocations;
            InvestmentInput {
                sqft: Decimal::from(1000),
                purchase_price,
                ltv_percent: Decimal::from(ltv),
                loan_tenure_years: tenure,
                annual_interest_rate_percent: rate,
                gross_rent_year: rent,
                dld_percent: dld,
                mortgage_reg_percent: reg_pct,
                mortgage_reg_fixed: reg_fixed,
                bank_processing_percent: bank,
                agency_fee_percent: agency,
                vat_percent: vat,
                title_deed_fee: title_deed,
                trustee_fee: trustee,
                property_valuation_fee: valuation,
                inspection_cost: inspection,
                conveyance_fee: conveyance,
                furnishing_cost: furnishing,
                utility_deposit: deposit,
                mortgage_release_fee: release,
                service_charge_monthly: service,
                home_insurance_monthly: insurance,
                utilities_monthly: utilities,
                cleaning_monthly: cleaning,
                capex_percent_rent: capex,
                rm_percent_rent: rm,
                mgmt_percent_rent: mgmt,
                vacancy_percent_rent: vacancy,
                refinance_percent_rent: refinance,
                cash_reserves_percent_rent: reserves,
                ..Default::default()
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn compute_is_pure(input in input_strat()) {
        prop_assert_eq!(compute(&input), compute(&input));
    }

    #[test]
    fn financing_reconstructs_price(input in input_strat()) {
        let r = compute(&input);
        prop_assert_eq!(r.down_payment + r.loan_amount, r.purchase_price);
    }

    #[test]
    fn cash_flow_identities(input in input_strat()) {
        let r = compute(&input);
        prop_assert_eq!(r.total_monthly_outflow, r.monthly_emi + r.total_monthly_recurring_expenses);
        prop_assert_eq!(r.annual_net_cash_flow, r.monthly_net_cash_flow * Decimal::from(12));
        prop_assert_eq!(r.acquisition_cost, r.purchase_price + r.upfront_expenses_total);
    }

    #[test]
    fn zero_rate_is_linear(mut input in input_strat()) {
        input.annual_interest_rate_percent = Decimal::ZERO;
        let r = compute(&input);
        let periods = input.loan_tenure_years * Decimal::from(12);
        if r.loan_amount > Decimal::ZERO {
            prop_assert_eq!(r.monthly_emi, r.loan_amount / periods);
        } else {
            prop_assert_eq!(r.monthly_emi, Decimal::ZERO);
        }
    }

    #[test]
    fn payback_only_with_positive_cash_flow(input in input_strat()) {
        let r = compute(&input);
        prop_assert_eq!(r.payback_period_years.is_some(), r.annual_net_cash_flow > Decimal::ZERO);
        if let Some(years) = r.payback_period_years {
            prop_assert!(years > Decimal::ZERO);
        }
    }

    #[test]
    fn line_items_are_non_negative(input in input_strat()) {
        let r = compute(&input);
        for item in r.upfront_costs.iter().chain(r.monthly_costs.iter()) {
            prop_assert!(item.amount >= Decimal::ZERO, "{} is negative", item.label);
        }
        prop_assert!(r.monthly_emi >= Decimal::ZERO);
    }

    #[test]
    fn future_costs_stay_out_of_cash_needed(input in input_strat()) {
        let r = compute(&input);
        prop_assert!(r.upfront_costs.iter().any(|item| item.label == "Mortgage Release"));
        prop_assert_eq!(
            r.total_cash_needed_upfront,
            r.down_payment + r.upfront_expenses_total + input.utility_deposit
        );
        let deductible: Decimal = r
            .upfront_costs
            .iter()
            .filter(|item| item.category == CostCategory::UpfrontDeductible)
            .map(|item| item.amount)
            .sum();
        prop_assert_eq!(r.upfront_expenses_total, deductible);
    }

    #[test]
    fn validated_inputs_pass(input in input_strat()) {
        prop_assert!(validate_input(&input, 2026).is_ok());
    }

    #[test]
    fn more_leverage_never_lowers_emi(input in input_strat()) {
        let mut higher = input.clone();
        higher.ltv_percent = (input.ltv_percent + Decimal::from(10)).min(Decimal::ONE_HUNDRED);
        prop_assert!(compute(&higher).monthly_emi >= compute(&input).monthly_emi);
    }
}
