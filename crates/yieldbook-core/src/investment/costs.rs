use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::InvestmentInput;
use crate::types::{percent_of, Money, Percent};

/// How a cost line is treated in the cash and yield totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    /// Paid at acquisition and not recovered; part of the acquisition cost
    UpfrontDeductible,
    /// Paid at acquisition and returned later (deposits)
    UpfrontRefundable,
    /// Not due at acquisition
    UpfrontFuture,
    Monthly,
}

/// One itemised cost with the formula it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub label: String,
    pub amount: Money,
    /// Human-readable basis, e.g. "4% PP" or "Fixed (Refundable)"
    pub basis: String,
    pub category: CostCategory,
}

impl CostLineItem {
    fn new(label: &str, amount: Money, basis: impl Into<String>, category: CostCategory) -> Self {
        Self {
            label: label.to_string(),
            amount,
            basis: basis.into(),
            category,
        }
    }

    /// Zero-amount refundable and future items stay visible so the
    /// breakdown shows that they were considered.
    pub fn is_displayed(&self) -> bool {
        self.amount > Decimal::ZERO
            || matches!(
                self.category,
                CostCategory::UpfrontRefundable | CostCategory::UpfrontFuture
            )
    }
}

fn pct_label(pct: Percent) -> String {
    format!("{}%", pct.normalize())
}

/// All upfront line items in display order, before filtering.
pub fn upfront_costs(input: &InvestmentInput, loan_amount: Money) -> Vec<CostLineItem> {
    use CostCategory::*;

    let pp = input.purchase_price;
    let agency_amount =
        percent_of(pp, input.agency_fee_percent) * (Decimal::ONE + input.vat_percent / Decimal::ONE_HUNDRED);

    vec![
        CostLineItem::new(
            "DLD Fee",
            percent_of(pp, input.dld_percent),
            format!("{} PP", pct_label(input.dld_percent)),
            UpfrontDeductible,
        ),
        CostLineItem::new(
            "Mortgage Registration",
            percent_of(loan_amount, input.mortgage_reg_percent) + input.mortgage_reg_fixed,
            format!(
                "{} Loan + {} {}",
                pct_label(input.mortgage_reg_percent),
                input.currency.code(),
                input.mortgage_reg_fixed.normalize()
            ),
            UpfrontDeductible,
        ),
        CostLineItem::new(
            "Bank Processing",
            percent_of(loan_amount, input.bank_processing_percent),
            format!("{} Loan", pct_label(input.bank_processing_percent)),
            UpfrontDeductible,
        ),
        CostLineItem::new("Title Deed Fee", input.title_deed_fee, "Fixed", UpfrontDeductible),
        CostLineItem::new("Registration Trustee", input.trustee_fee, "Fixed", UpfrontDeductible),
        CostLineItem::new("Valuation", input.property_valuation_fee, "Fixed", UpfrontDeductible),
        CostLineItem::new(
            "Agency Fee (incl. VAT)",
            agency_amount,
            format!(
                "{} PP + {} VAT",
                pct_label(input.agency_fee_percent),
                pct_label(input.vat_percent)
            ),
            UpfrontDeductible,
        ),
        CostLineItem::new("Inspection", input.inspection_cost, "Fixed (Optional)", UpfrontDeductible),
        CostLineItem::new("Conveyance", input.conveyance_fee, "Fixed (Legal)", UpfrontDeductible),
        CostLineItem::new("Furnishing", input.furnishing_cost, "Fixed (Optional)", UpfrontDeductible),
        CostLineItem::new(
            "Utility Deposit",
            input.utility_deposit,
            "Fixed (Refundable)",
            UpfrontRefundable,
        ),
        CostLineItem::new(
            "Mortgage Release",
            input.mortgage_release_fee,
            "Fixed (Future)",
            UpfrontFuture,
        ),
    ]
}

/// All monthly line items in display order, before filtering.
pub fn monthly_costs(input: &InvestmentInput, gross_rent_month: Money) -> Vec<CostLineItem> {
    let fixed = |label: &str, amount: Money, basis: &str| {
        CostLineItem::new(label, amount, basis, CostCategory::Monthly)
    };
    let of_rent = |label: &str, pct: Percent| {
        CostLineItem::new(
            label,
            percent_of(gross_rent_month, pct),
            format!("{} Rent", pct_label(pct)),
            CostCategory::Monthly,
        )
    };

    vec![
        fixed("Service Charge", input.service_charge_monthly, "Fixed"),
        fixed("Home Insurance", input.home_insurance_monthly, "Fixed"),
        fixed("Utilities", input.utilities_monthly, "Fixed/Estimate"),
        fixed("Cleaning", input.cleaning_monthly, "Fixed/Estimate"),
        of_rent("Capex Reserve", input.capex_percent_rent),
        of_rent("Repairs/Maintenance", input.rm_percent_rent),
        of_rent("Property Management", input.mgmt_percent_rent),
        of_rent("Vacancy Loss", input.vacancy_percent_rent),
        of_rent("Refinance Cost", input.refinance_percent_rent),
        of_rent("Cash Reserves", input.cash_reserves_percent_rent),
    ]
}

/// Sum of items in `category`.
pub fn total_for(items: &[CostLineItem], category: CostCategory) -> Money {
    items
        .iter()
        .filter(|item| item.category == category)
        .map(|item| item.amount)
        .sum()
}
