//! Refinancing costs, original commission refund and payback period

use chrono::NaiveDate;

use crate::calendar::months_between;

use super::types::RefinanceInput;

/// New-loan commission (on the new amount) + early repayment fee (on the
/// current balance) + other costs
pub fn refinancing_costs(input: &RefinanceInput) -> f64 {
    let advanced = &input.advanced;
    let new_loan_commission = advanced.new_loan_commission.resolve(advanced.new_loan_amount);
    let early_repayment_fee = advanced.early_repayment_fee.resolve(input.basic.current_loan_balance);
    new_loan_commission + early_repayment_fee + advanced.other_costs.unwrap_or(0.0)
}

/// Refund of the original commission proportional to the unused term:
/// `commission * remaining / (elapsed + remaining)`.
///
/// Zero when the original commission, loan amount or start date is missing.
pub fn commission_refund(input: &RefinanceInput, refinance_date: NaiveDate, original_start: Option<NaiveDate>) -> f64 {
    let advanced = &input.advanced;
    let (Some(commission), Some(original_amount), Some(start)) =
        (advanced.original_commission, advanced.original_loan_amount, original_start)
    else {
        return 0.0;
    };

    let remaining = input.remaining_months() as i64;
    // Clamped so the refund never exceeds the commission
    let elapsed = (months_between(start, refinance_date) as i64).max(0);
    let original_total = elapsed + remaining;
    if original_total <= 0 {
        return 0.0;
    }

    commission.resolve(original_amount) * remaining as f64 / original_total as f64
}

/// Months until installment savings cover the net cost.
///
/// `None` when refinancing does not lower the installment; `Some(0)` when the
/// refund already covers the costs.
pub fn payback_period(net_cost: f64, monthly_savings: f64) -> Option<u32> {
    if monthly_savings.is_nan() || monthly_savings <= 0.0 {
        return None;
    }
    if net_cost <= 0.0 {
        return Some(0);
    }
    Some((net_cost / monthly_savings).ceil() as u32)
}
