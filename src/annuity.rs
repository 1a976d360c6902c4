//! Closed-form installment formulas
//!
//! Rates here are periodic (monthly) fractions, e.g. 0.075 / 12 for 7.5% p.a.

use crate::loan::InstallmentType;

/// Equal (annuity) installment: PMT = P * r(1+r)^n / ((1+r)^n - 1)
///
/// A zero rate degenerates to straight-line repayment `P / n`.
pub fn equal_installment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// First (largest) installment of a decreasing schedule:
/// fixed principal share plus interest on the full principal
pub fn first_decreasing_installment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    principal / months as f64 + principal * monthly_rate
}

/// Headline installment under the average-month convention
/// (`annual_rate / 12` per period). `annual_rate` is a fraction.
pub fn average_month_installment(
    principal: f64,
    annual_rate: f64,
    months: u32,
    installment_type: InstallmentType,
) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    match installment_type {
        InstallmentType::Equal => equal_installment(principal, monthly_rate, months),
        InstallmentType::Decreasing => first_decreasing_installment(principal, monthly_rate, months),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equal_installment_reference_loan() {
        // 300k at 7.5% over 25 years
        let pmt = equal_installment(300_000.0, 0.075 / 12.0, 300);
        assert_abs_diff_eq!(pmt, 2216.97, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(equal_installment(300_000.0, 0.0, 300), 1000.0);
        assert_eq!(average_month_installment(120_000.0, 0.0, 120, InstallmentType::Equal), 1000.0);
    }

    #[test]
    fn test_first_decreasing_installment() {
        let first = first_decreasing_installment(300_000.0, 0.075 / 12.0, 240);
        assert_abs_diff_eq!(first, 1250.0 + 1875.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shorter_term_means_higher_installment() {
        let long = average_month_installment(200_000.0, 0.06, 360, InstallmentType::Equal);
        let short = average_month_installment(200_000.0, 0.06, 180, InstallmentType::Equal);
        assert!(short > long);

        let long = average_month_installment(200_000.0, 0.06, 360, InstallmentType::Decreasing);
        let short = average_month_installment(200_000.0, 0.06, 180, InstallmentType::Decreasing);
        assert!(short > long);
    }
}
