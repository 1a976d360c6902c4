//! Searches over whole-month loan terms

use crate::annuity::average_month_installment;
use crate::error::{EngineError, EngineResult};
use crate::loan::InstallmentType;

fn check_search_inputs(loan_amount: f64, annual_rate: f64, limit: f64, min_term: u32) -> EngineResult<()> {
    if !loan_amount.is_finite() || loan_amount <= 0.0 {
        return Err(EngineError::computation("term search", "loan amount must be positive"));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(EngineError::computation("term search", "annual rate must be a non-negative number"));
    }
    if !limit.is_finite() {
        return Err(EngineError::computation("term search", "installment limit is not a finite number"));
    }
    if min_term == 0 {
        return Err(EngineError::computation("term search", "minimum term must be at least one month"));
    }
    Ok(())
}

/// Shortest term in `[min_term, max_term]` whose average-month installment does
/// not exceed `max_installment`. Linear scan upward, stopping at the first hit.
/// `None` when even `max_term` is too expensive.
pub fn shortest_term_within_limit(
    loan_amount: f64,
    annual_rate: f64,
    installment_type: InstallmentType,
    max_installment: f64,
    min_term: u32,
    max_term: u32,
) -> EngineResult<Option<u32>> {
    check_search_inputs(loan_amount, annual_rate, max_installment, min_term)?;

    Ok((min_term..=max_term)
        .find(|&term| average_month_installment(loan_amount, annual_rate, term, installment_type) <= max_installment))
}

/// Binary-search variant of [`shortest_term_within_limit`]. Relies on the
/// installment falling as the term grows, which holds for both installment types.
pub fn shortest_term_bisect(
    loan_amount: f64,
    annual_rate: f64,
    installment_type: InstallmentType,
    max_installment: f64,
    min_term: u32,
    max_term: u32,
) -> EngineResult<Option<u32>> {
    check_search_inputs(loan_amount, annual_rate, max_installment, min_term)?;

    let fits = |term: u32| average_month_installment(loan_amount, annual_rate, term, installment_type) <= max_installment;
    if min_term > max_term || !fits(max_term) {
        return Ok(None);
    }

    let (mut lo, mut hi) = (min_term, max_term);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(Some(lo))
}

/// Term whose installment comes closest to `target` without exceeding it,
/// clamped to `[min_term, max_term]`. Unreachable targets give `max_term`.
pub fn term_for_target_installment(
    loan_amount: f64,
    annual_rate: f64,
    target: f64,
    installment_type: InstallmentType,
    min_term: u32,
    max_term: u32,
) -> EngineResult<u32> {
    check_search_inputs(loan_amount, annual_rate, target, min_term)?;
    if min_term > max_term {
        return Err(EngineError::computation("term search", "minimum term exceeds maximum term"));
    }

    match installment_type {
        InstallmentType::Decreasing => {
            // first installment = P / n + P * r / 12, solved for n
            let monthly_interest = loan_amount * annual_rate / 12.0;
            if target <= monthly_interest {
                return Ok(max_term);
            }
            let months = (loan_amount / (target - monthly_interest)).ceil();
            Ok((months as u32).clamp(min_term, max_term))
        }
        InstallmentType::Equal => {
            let term = shortest_term_bisect(loan_amount, annual_rate, installment_type, target, min_term, max_term)?;
            Ok(term.unwrap_or(max_term))
        }
    }
}
