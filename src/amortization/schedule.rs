//! Installment records and scenario results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loan::LoanTerm;

/// Single installment of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentDetails {
    /// Installment number (1-indexed)
    pub installment_number: u32,

    pub date: NaiveDate,

    /// principal_amount + interest_amount; overpayments are not included
    pub total_amount: f64,

    pub principal_amount: f64,

    pub interest_amount: f64,

    /// Extra principal paid this period
    pub overpayment_amount: f64,

    /// Outstanding principal after this period
    pub remaining_debt: f64,

    /// Part of the overpayment coming from one-time or expanded cyclic entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_overpayment: Option<f64>,

    /// Part of the overpayment coming from the progressive strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive_overpayment: Option<f64>,
}

/// Totals of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Installments plus overpayments
    pub total_payment: f64,
    pub total_interest: f64,
    /// Actual number of installments paid
    pub loan_term: LoanTerm,
}

/// Schedule and totals of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub installments: Vec<InstallmentDetails>,
    pub summary: ScenarioSummary,
}

impl ScenarioResult {
    pub fn new() -> Self {
        Self {
            installments: Vec::new(),
            summary: ScenarioSummary {
                total_payment: 0.0,
                total_interest: 0.0,
                loan_term: LoanTerm::default(),
            },
        }
    }

    pub fn add_installment(&mut self, installment: InstallmentDetails) {
        self.installments.push(installment);
        self.summary.loan_term = LoanTerm::from_months(self.installments.len() as u32);
    }

    pub fn term_months(&self) -> u32 {
        self.installments.len() as u32
    }

    /// Number of periods that carried an overpayment
    pub fn overpayment_periods(&self) -> usize {
        self.installments.iter().filter(|i| i.overpayment_amount > 0.0).count()
    }

    pub fn total_overpayment(&self) -> f64 {
        self.installments.iter().map(|i| i.overpayment_amount).sum()
    }

    pub fn final_debt(&self) -> f64 {
        self.installments.last().map(|i| i.remaining_debt).unwrap_or(0.0)
    }
}

impl Default for ScenarioResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline minus overpayment scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub total_amount: f64,
    pub interest_amount: f64,
    /// Only reported by effects that shorten the term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_reduction: Option<LoanTerm>,
}

impl Savings {
    pub fn between(base: &ScenarioResult, with_overpayments: &ScenarioResult, report_term: bool) -> Self {
        let time_reduction = report_term
            .then(|| LoanTerm::from_months(base.term_months().saturating_sub(with_overpayments.term_months())));
        Self {
            total_amount: base.summary.total_payment - with_overpayments.summary.total_payment,
            interest_amount: base.summary.total_interest - with_overpayments.summary.total_interest,
            time_reduction,
        }
    }
}

/// Full amortization result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub base_scenario: ScenarioResult,
    pub overpayment_scenario: ScenarioResult,
    pub savings: Savings,
}
