//! Full payment schedule for one loan definition under either interest convention

use chrono::NaiveDate;

use crate::annuity::average_month_installment;
use crate::calendar::{add_calendar_months, anchor_to_day, days_between};
use crate::config::DEFAULT_PAYMENT_DAY;
use crate::error::{EngineError, EngineResult};
use crate::loan::InstallmentType;

use super::types::{InterestConvention, RefinanceComparison, RefinanceInstallment, RefinanceVariant};

/// Balance below which the last payment absorbs the rounding remainder
const ROUNDING_TOLERANCE: f64 = 0.01;

/// Generated schedule with its aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct LoanSchedule {
    pub installments: Vec<RefinanceInstallment>,
    /// Headline installment: the annuity, or the first decreasing installment
    pub monthly_installment: f64,
    pub total_amount: f64,
    pub total_interest: f64,
}

impl LoanSchedule {
    pub fn term_months(&self) -> u32 {
        self.installments.len() as u32
    }

    /// Comparison without refinance extras
    pub fn comparison(&self) -> RefinanceComparison {
        RefinanceComparison {
            monthly_installment: self.monthly_installment,
            loan_term_months: self.term_months(),
            total_amount: self.total_amount,
            total_interest: self.total_interest,
            commission_refund: None,
            refinancing_costs: None,
            total_benefit: None,
            payback_period_months: None,
        }
    }

    pub fn into_variant(self, comparison: RefinanceComparison) -> RefinanceVariant {
        RefinanceVariant {
            comparison,
            schedule: self.installments,
        }
    }
}

/// Builds refinance schedules. The first payment falls one month after the start date.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleGenerator {
    convention: InterestConvention,
    payment_day: u32,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new(InterestConvention::default())
    }
}

impl ScheduleGenerator {
    pub fn new(convention: InterestConvention) -> Self {
        Self {
            convention,
            payment_day: DEFAULT_PAYMENT_DAY,
        }
    }

    /// Day of month payments are anchored to under `ExactDay`
    pub fn with_payment_day(mut self, day: u32) -> Self {
        self.payment_day = day;
        self
    }

    pub fn convention(&self) -> InterestConvention {
        self.convention
    }

    /// `annual_rate` is a fraction (0.075 for 7.5%)
    pub fn generate(
        &self,
        loan_amount: f64,
        annual_rate: f64,
        total_months: u32,
        installment_type: InstallmentType,
        start_date: NaiveDate,
    ) -> EngineResult<LoanSchedule> {
        if !loan_amount.is_finite() || loan_amount <= 0.0 {
            return Err(EngineError::computation("schedule", "loan amount must be positive"));
        }
        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(EngineError::computation("schedule", "annual rate must be a non-negative number"));
        }
        if total_months == 0 {
            return Err(EngineError::computation("schedule", "term must be at least one month"));
        }

        let monthly_installment = average_month_installment(loan_amount, annual_rate, total_months, installment_type);
        let fixed_principal = loan_amount / total_months as f64;
        let monthly_rate = annual_rate / 12.0;
        let daily_rate = annual_rate / 365.0;

        let mut installments = Vec::with_capacity(total_months as usize);
        let mut balance = loan_amount;
        let mut previous_date = start_date;
        let mut total_amount = 0.0;
        let mut total_interest = 0.0;

        for number in 1..=total_months {
            let (date, interest, days_in_period) = match self.convention {
                InterestConvention::AverageMonth => {
                    (add_calendar_months(start_date, number), balance * monthly_rate, None)
                }
                InterestConvention::ExactDay => {
                    let date = anchor_to_day(add_calendar_months(start_date, number), self.payment_day);
                    let days = days_between(previous_date, date);
                    (date, balance * daily_rate * days as f64, Some(days))
                }
            };

            let mut principal = match installment_type {
                InstallmentType::Equal => (monthly_installment - interest).max(0.0),
                InstallmentType::Decreasing => fixed_principal,
            }
            .min(balance);

            let last = number == total_months;
            if last || balance - principal < ROUNDING_TOLERANCE {
                principal = balance;
            }

            balance = (balance - principal).max(0.0);
            let amount = principal + interest;
            if !amount.is_finite() {
                return Err(EngineError::computation("schedule", "installment is not a finite number"));
            }

            total_amount += amount;
            total_interest += interest;
            installments.push(RefinanceInstallment {
                installment_number: number,
                date,
                amount,
                principal,
                interest,
                remaining_balance: balance,
                days_in_period,
            });
            previous_date = date;

            if balance <= 0.0 {
                break;
            }
        }

        Ok(LoanSchedule {
            installments,
            monthly_installment,
            total_amount,
            total_interest,
        })
    }
}
