//! Expansion of one-time and cyclic overpayments into dated entries

use chrono::NaiveDate;

use crate::calendar::{add_calendar_months, is_same_month, months_between};
use crate::loan::{CyclicOverpayment, Overpayment, OverpaymentEffect};

/// Expand configured overpayments into a date-sorted list bounded by the loan term.
///
/// One-time entries outside `[loan_start, loan_start + total_months]` are dropped.
/// Cyclic entries are generated from `start_date` (or the loan start) in steps of
/// the frequency until `end_date` is passed or the loan end is reached. Under
/// `ProgressiveOverpayment` the cyclic amount depends on the running installment,
/// so it is evaluated per period by the engine and not expanded here.
pub fn expand_overpayments(
    one_time: &[Overpayment],
    cyclic: Option<&CyclicOverpayment>,
    loan_start: NaiveDate,
    total_months: u32,
    effect: OverpaymentEffect,
) -> Vec<Overpayment> {
    let loan_end = add_calendar_months(loan_start, total_months);

    let mut entries: Vec<Overpayment> = one_time
        .iter()
        .filter(|o| o.date >= loan_start && o.date <= loan_end)
        .copied()
        .collect();

    if let Some(plan) = cyclic {
        if effect != OverpaymentEffect::ProgressiveOverpayment {
            let anchor = plan.start_date.unwrap_or(loan_start);
            let step = plan.frequency.months();
            let mut k: u32 = 0;
            loop {
                let date = add_calendar_months(anchor, k.saturating_mul(step));
                k += 1;
                if plan.end_date.map_or(false, |end| date > end) || date >= loan_end {
                    break;
                }
                if date < loan_start {
                    continue;
                }
                entries.push(Overpayment::new(date, plan.amount));
            }
        }
    }

    // Stable: entries on the same date keep one-time before cyclic
    entries.sort_by_key(|o| o.date);
    entries
}

/// Whether `current` is a payment month of the cyclic plan
pub fn is_cyclic_period(current: NaiveDate, plan: &CyclicOverpayment, loan_start: NaiveDate) -> bool {
    if plan.start_date.map_or(false, |start| current < start) {
        return false;
    }
    if plan.end_date.map_or(false, |end| current > end) {
        return false;
    }
    let since_start = months_between(plan.start_date.unwrap_or(loan_start), current);
    if since_start < 0 {
        return false;
    }
    since_start % plan.frequency.months() as i32 == 0
}

/// Expanded overpayments, queried per installment month
#[derive(Debug, Clone, Default)]
pub struct OverpaymentPlan {
    entries: Vec<Overpayment>,
}

impl OverpaymentPlan {
    pub fn new(entries: Vec<Overpayment>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Overpayment] {
        &self.entries
    }

    /// Sum of all entries dated in the same calendar month as `date`
    pub fn for_month(&self, date: NaiveDate) -> f64 {
        self.entries
            .iter()
            .filter(|o| is_same_month(o.date, date))
            .map(|o| o.amount)
            .sum()
    }
}
