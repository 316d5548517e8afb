use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::YieldbookError;
use crate::types::{Currency, Money, Percent, Years};
use crate::YieldbookResult;

/// Largest accepted amount for any monetary field.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Largest accepted percentage for rates, fees and allocations.
pub const MAX_PERCENT: Percent = dec!(1000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Construction status of the unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[default]
    #[serde(alias = "ready")]
    Ready,
    /// Sold before completion; a handover year is mandatory.
    #[serde(alias = "offplan", alias = "OffPlan", alias = "Off-plan")]
    Offplan,
}

/// Raw inputs of the property investment calculator.
///
/// Percentages are on a 0-100 scale. Every optional fee, monthly cost and
/// percent-of-rent allocation defaults to zero when absent. Field names are
/// snake_case; the camelCase ids of the calculator form are accepted as
/// aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    // --- Identity ---
    #[serde(default, alias = "projectName")]
    pub project_name: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "bedBath")]
    pub bed_bath: String,
    #[serde(default)]
    pub status: PropertyStatus,
    /// Expected handover year (Offplan only)
    #[serde(default, alias = "handoverYear", skip_serializing_if = "Option::is_none")]
    pub handover_year: Option<i32>,
    #[serde(default)]
    pub currency: Currency,

    // --- Sizing ---
    /// Built-up area in square feet
    pub sqft: Decimal,

    // --- Acquisition ---
    #[serde(alias = "purchasePrice", alias = "pp")]
    pub purchase_price: Money,
    #[serde(alias = "ltvPercent", alias = "ltv")]
    pub ltv_percent: Percent,
    #[serde(alias = "loanTenureYears", alias = "loanTenure")]
    /// Whole or fractional years
    pub loan_tenure_years: Years,
    #[serde(alias = "annualInterestRatePercent", alias = "annualInterestRate", alias = "interestRate")]
    pub annual_interest_rate_percent: Percent,

    // --- Rent ---
    #[serde(alias = "grossRentYear")]
    pub gross_rent_year: Money,

    // --- Upfront fees ---
    #[serde(default, alias = "dldPercent")]
    pub dld_percent: Percent,
    #[serde(default, alias = "mortgageRegPercent")]
    pub mortgage_reg_percent: Percent,
    #[serde(default, alias = "mortgageRegFixed")]
    pub mortgage_reg_fixed: Money,
    #[serde(default, alias = "bankProcessingPercent")]
    pub bank_processing_percent: Percent,
    #[serde(default, alias = "agencyFeePercent")]
    pub agency_fee_percent: Percent,
    #[serde(default, alias = "vatPercent")]
    pub vat_percent: Percent,
    #[serde(default, alias = "titleDeedFee")]
    pub title_deed_fee: Money,
    #[serde(default, alias = "trusteeFee")]
    pub trustee_fee: Money,
    #[serde(default, alias = "propertyValuationFee")]
    pub property_valuation_fee: Money,
    #[serde(default, alias = "inspectionCost")]
    pub inspection_cost: Money,
    #[serde(default, alias = "conveyanceFee")]
    pub conveyance_fee: Money,
    #[serde(default, alias = "furnishingCost")]
    pub furnishing_cost: Money,
    /// Refunded when the tenancy ends
    #[serde(default, alias = "utilityDeposit")]
    pub utility_deposit: Money,
    /// Payable when the mortgage is discharged, not at acquisition
    #[serde(default, alias = "mortgageReleaseFee")]
    pub mortgage_release_fee: Money,

    // --- Monthly fixed costs ---
    #[serde(default, alias = "serviceChargeMonthly")]
    pub service_charge_monthly: Money,
    #[serde(default, alias = "homeInsuranceMonthly")]
    pub home_insurance_monthly: Money,
    #[serde(default, alias = "utilitiesMonthly")]
    pub utilities_monthly: Money,
    #[serde(default, alias = "cleaningMonthly")]
    pub cleaning_monthly: Money,

    // --- Monthly allocations (percent of monthly gross rent) ---
    #[serde(default, alias = "capexPercentRent", alias = "capexPercent")]
    pub capex_percent_rent: Percent,
    #[serde(default, alias = "rmPercentRent", alias = "rmPercent")]
    pub rm_percent_rent: Percent,
    #[serde(default, alias = "mgmtPercentRent", alias = "mgmtPercent")]
    pub mgmt_percent_rent: Percent,
    #[serde(default, alias = "vacancyPercentRent", alias = "vacancyPercent")]
    pub vacancy_percent_rent: Percent,
    #[serde(default, alias = "refinancePercentRent", alias = "refinancePercent")]
    pub refinance_percent_rent: Percent,
    #[serde(default, alias = "cashReservesPercentRent", alias = "cashReservesPercent")]
    pub cash_reserves_percent_rent: Percent,
}

impl InvestmentInput {
    /// Fee, cost and allocation fields that must never be negative.
    fn non_negative_fields(&self) -> [(&'static str, Decimal); 24] {
        [
            ("dld_percent", self.dld_percent),
            ("mortgage_reg_percent", self.mortgage_reg_percent),
            ("mortgage_reg_fixed", self.mortgage_reg_fixed),
            ("bank_processing_percent", self.bank_processing_percent),
            ("agency_fee_percent", self.agency_fee_percent),
            ("vat_percent", self.vat_percent),
            ("title_deed_fee", self.title_deed_fee),
            ("trustee_fee", self.trustee_fee),
            ("property_valuation_fee", self.property_valuation_fee),
            ("inspection_cost", self.inspection_cost),
            ("conveyance_fee", self.conveyance_fee),
            ("furnishing_cost", self.furnishing_cost),
            ("utility_deposit", self.utility_deposit),
            ("mortgage_release_fee", self.mortgage_release_fee),
            ("service_charge_monthly", self.service_charge_monthly),
            ("home_insurance_monthly", self.home_insurance_monthly),
            ("utilities_monthly", self.utilities_monthly),
            ("cleaning_monthly", self.cleaning_monthly),
            ("capex_percent_rent", self.capex_percent_rent),
            ("rm_percent_rent", self.rm_percent_rent),
            ("mgmt_percent_rent", self.mgmt_percent_rent),
            ("vacancy_percent_rent", self.vacancy_percent_rent),
            ("refinance_percent_rent", self.refinance_percent_rent),
            ("cash_reserves_percent_rent", self.cash_reserves_percent_rent),
        ]
    }

    /// Every amount and percentage subject to [`MAX_AMOUNT`] / [`MAX_PERCENT`].
    fn bounded_fields(&self) -> impl Iterator<Item = (&'static str, Decimal)> {
        [
            ("purchase_price", self.purchase_price),
            ("gross_rent_year", self.gross_rent_year),
            ("annual_interest_rate_percent", self.annual_interest_rate_percent),
        ]
        .into_iter()
        .chain(self.non_negative_fields())
    }
}

fn ceiling_for(field: &str) -> Decimal {
    if field.contains("percent") {
        MAX_PERCENT
    } else {
        MAX_AMOUNT
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Static range and presence rules applied before any computation.
///
/// `current_year` is the calendar year an Offplan handover may not precede.
/// The first violated rule is returned; nothing is computed on failure.
pub fn validate_input(input: &InvestmentInput, current_year: i32) -> YieldbookResult<()> {
    if input.sqft <= Decimal::ZERO {
        return Err(YieldbookError::invalid("sqft", "Area must be positive"));
    }

    if input.purchase_price <= Decimal::ZERO {
        return Err(YieldbookError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }

    if input.gross_rent_year < Decimal::ZERO {
        return Err(YieldbookError::invalid(
            "gross_rent_year",
            "Gross annual rent cannot be negative",
        ));
    }

    if input.ltv_percent < Decimal::ZERO || input.ltv_percent > Decimal::ONE_HUNDRED {
        return Err(YieldbookError::invalid(
            "ltv_percent",
            "LTV must be between 0 and 100",
        ));
    }

    if input.loan_tenure_years < Decimal::ONE {
        return Err(YieldbookError::invalid(
            "loan_tenure_years",
            "Loan tenure must be at least 1 year",
        ));
    }

    if input.annual_interest_rate_percent < Decimal::ZERO {
        return Err(YieldbookError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }

    if let Some((field, _)) = input
        .non_negative_fields()
        .into_iter()
        .find(|(_, value)| *value < Decimal::ZERO)
    {
        return Err(YieldbookError::invalid(field, "Value cannot be negative"));
    }

    if let Some((field, _)) = input
        .bounded_fields()
        .find(|(field, value)| *value > ceiling_for(field))
    {
        return Err(YieldbookError::invalid(
            field,
            format!("Value exceeds the accepted maximum of {}", ceiling_for(field)),
        ));
    }

    if input.status == PropertyStatus::Offplan {
        match input.handover_year {
            None => {
                return Err(YieldbookError::invalid(
                    "handover_year",
                    "Handover year is required for off-plan properties",
                ));
            }
            Some(year) if year < current_year => {
                return Err(YieldbookError::invalid(
                    "handover_year",
                    format!("Handover year {year} is before {current_year}"),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
