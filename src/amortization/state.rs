//! Running state of a single amortization scenario

use chrono::NaiveDate;

use crate::calendar::add_calendar_months;
use crate::loan::MortgageInput;

/// State of a loan between installments
#[derive(Debug, Clone)]
pub struct ScenarioState {
    /// Number of the next installment (1-indexed)
    pub installment_number: u32,

    /// Date of the next installment
    pub current_date: NaiveDate,

    /// Outstanding principal
    pub remaining_debt: f64,

    /// Scheduled installments left, including the next one
    pub months_remaining: u32,

    /// Sum of installments and overpayments paid so far
    pub total_payment: f64,

    /// Sum of interest paid so far
    pub total_interest: f64,

    /// Set once an overpayment has been applied; recalculating effects switch
    /// from the original schedule to (remaining debt, months remaining)
    pub recalculating: bool,

    start_date: NaiveDate,
}

impl ScenarioState {
    pub fn from_input(input: &MortgageInput) -> Self {
        Self {
            installment_number: 1,
            current_date: input.start_date,
            remaining_debt: input.loan_amount,
            months_remaining: input.total_months(),
            total_payment: 0.0,
            total_interest: 0.0,
            recalculating: false,
            start_date: input.start_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_debt > 0.0 && self.months_remaining > 0
    }

    /// Last scheduled installment of the original term
    pub fn is_final_period(&self) -> bool {
        self.months_remaining == 1
    }

    pub fn record_payment(&mut self, installment: f64, overpayment: f64, interest: f64) {
        self.total_payment += installment + overpayment;
        self.total_interest += interest;
    }

    /// Move to the next installment. Dates are derived from the loan start so
    /// end-of-month clamping never accumulates (Jan 31, Feb 29, Mar 31, ...).
    pub fn advance_month(&mut self) {
        self.current_date = add_calendar_months(self.start_date, self.installment_number);
        self.installment_number += 1;
        self.months_remaining = self.months_remaining.saturating_sub(1);
    }
}
