use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Money, Percent, Years};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Equated monthly installment of a fixed-rate amortising loan.
///
/// `annual_rate` is a percentage (5 = 5% p.a.) and `years` may be fractional.
/// Degenerate loans never fail: a non-positive principal or tenure, a monthly
/// rate at or below -100%, a zero annuity denominator or an overflowing
/// compound factor all yield 0. A zero rate amortises linearly.
pub fn monthly_installment(principal: Money, annual_rate: Percent, years: Years) -> Money {
    if principal <= Decimal::ZERO || years <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let Some(periods) = years.checked_mul(Decimal::from(MONTHS_PER_YEAR)) else {
        warn!(%years, "tenure overflowed, installment set to zero");
        return Decimal::ZERO;
    };

    if annual_rate.is_zero() {
        return principal / periods;
    }

    let monthly_rate = annual_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR);
    if monthly_rate <= dec!(-1) {
        warn!(%annual_rate, "monthly rate at or below -100%, installment set to zero");
        return Decimal::ZERO;
    }

    // P * r(1+r)^n / ((1+r)^n - 1)
    let Some(compound) = compound_factor(Decimal::ONE + monthly_rate, periods) else {
        warn!(%principal, %annual_rate, %years, "compound factor overflowed, installment set to zero");
        return Decimal::ZERO;
    };

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|numerator| numerator.checked_div(denominator))
        .unwrap_or_else(|| {
            warn!(%principal, %annual_rate, %years, "installment overflowed, set to zero");
            Decimal::ZERO
        })
}

/// `base^periods`: exact repeated multiplication for whole periods,
/// `exp(periods * ln(base))` otherwise.
fn compound_factor(base: Decimal, periods: Decimal) -> Option<Decimal> {
    match periods.fract().is_zero().then(|| periods.to_u64()).flatten() {
        Some(whole) => base.checked_powu(whole),
        None => base.checked_powd(periods),
    }
}

/// Installment and lifetime totals of a fixed-rate loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub years: Years,
    pub monthly_installment: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
}

/// Totals are zero whenever the installment is, or when they cannot be represented.
pub fn loan_summary(principal: Money, annual_rate: Percent, years: Years) -> LoanSummary {
    let installment = monthly_installment(principal, annual_rate, years);
    let total_repayment = years
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .and_then(|periods| installment.checked_mul(periods))
        .unwrap_or_else(|| {
            warn!(%installment, %years, "total repayment overflowed, set to zero");
            Decimal::ZERO
        });
    let total_interest = if installment.is_zero() || total_repayment.is_zero() {
        Decimal::ZERO
    } else {
        total_repayment - principal
    };

    LoanSummary {
        principal,
        annual_rate_percent: annual_rate,
        years,
        monthly_installment: installment,
        total_repayment,
        total_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_summary_totals() {
        let summary = loan_summary(dec!(500000), dec!(5), dec!(10));
        assert_eq!(summary.total_repayment, summary.monthly_installment * dec!(120));
        assert!((summary.total_interest - dec!(136393.09)).abs() < dec!(1));

        let interest_free = loan_summary(dec!(120000), Decimal::ZERO, dec!(10));
        assert_eq!(interest_free.monthly_installment, dec!(1000));
        assert_eq!(interest_free.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_standard_amortisation() {
        // 500,000 at 5% over 10 years => ~5,303.28 per month
        let emi = monthly_installment(dec!(500000), dec!(5), dec!(10));
        assert!(
            (emi - dec!(5303.28)).abs() < dec!(0.01),
            "Expected EMI ~5303.28, got {emi}"
        );
    }

    #[test]
    fn test_twenty_five_year_mortgage() {
        // 1,000,000 at 4.5% over 25 years => ~5,558.32
        let emi = monthly_installment(dec!(1000000), dec!(4.5), dec!(25));
        assert!((emi - dec!(5558.32)).abs() < dec!(0.01), "got {emi}");
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let emi = monthly_installment(dec!(500000), Decimal::ZERO, dec!(10));
        assert_eq!(emi, dec!(500000) / dec!(120));
    }

    #[test]
    fn test_zero_principal_or_tenure() {
        assert_eq!(monthly_installment(Decimal::ZERO, dec!(5), dec!(10)), Decimal::ZERO);
        assert_eq!(monthly_installment(dec!(-10), dec!(5), dec!(10)), Decimal::ZERO);
        assert_eq!(monthly_installment(dec!(500000), dec!(5), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_rate_at_minus_hundred_percent_monthly() {
        // -1200% p.a. => r = -1 per month
        assert_eq!(
            monthly_installment(dec!(100000), dec!(-1200), dec!(5)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_overflowing_compound_factor() {
        // (1 + 10)^(1200 * 12) cannot be represented
        assert_eq!(
            monthly_installment(dec!(100000), dec!(13200), dec!(1200)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_installment_exceeds_interest_only_payment() {
        let principal = dec!(750000);
        let emi = monthly_installment(principal, dec!(6), dec!(20));
        let interest_only = principal * dec!(0.06) / dec!(12);
        assert!(emi > interest_only);
        assert!(emi * dec!(240) > principal);
    }

    #[test]
    fn test_fractional_tenure() {
        // 2.5 years is 30 whole months
        let whole_months = monthly_installment(dec!(100000), dec!(6), dec!(2.5));
        assert!((whole_months - dec!(3597.89)).abs() < dec!(0.01), "got {whole_months}");

        // 2.55 years is 30.6 months
        let partial = monthly_installment(dec!(100000), dec!(6), dec!(2.55));
        assert!((partial - dec!(3532.49)).abs() < dec!(0.05), "got {partial}");
        assert!(partial < whole_months);
        assert!(partial > monthly_installment(dec!(100000), dec!(6), dec!(31) / dec!(12)));

        assert_eq!(
            monthly_installment(dec!(30600), Decimal::ZERO, dec!(2.55)),
            dec!(1000)
        );
    }

    #[test]
    fn test_negative_tenure_is_zero() {
        assert_eq!(monthly_installment(dec!(100000), dec!(5), dec!(-3)), Decimal::ZERO);
    }
}
