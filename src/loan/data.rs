//! Mortgage input data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{require_positive, EngineError, EngineResult};

/// Longest supported loan term
pub const MAX_TERM_YEARS: u32 = 35;

/// Loan term as years plus months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanTerm {
    pub years: u32,
    pub months: u32,
}

impl LoanTerm {
    pub fn new(years: u32, months: u32) -> Self {
        Self { years, months }
    }

    /// Normalize a month count into years and months
    pub fn from_months(total: u32) -> Self {
        Self {
            years: total / 12,
            months: total % 12,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    /// Range check: years in [0, 35], months in [0, 11], non-zero total
    pub fn validate(&self, field: &str) -> EngineResult<()> {
        if self.years > MAX_TERM_YEARS {
            return Err(EngineError::validation(field, format!("years must not exceed {}", MAX_TERM_YEARS)));
        }
        if self.months > 11 {
            return Err(EngineError::validation(field, "months must be between 0 and 11"));
        }
        if self.total_months() == 0 {
            return Err(EngineError::validation(field, "term must be longer than zero months"));
        }
        Ok(())
    }
}

/// Repayment structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentType {
    /// Fixed total payment (annuity)
    Equal,
    /// Fixed principal share, total falls with interest
    Decreasing,
}

/// Scheduled change of the nominal annual rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRateChange {
    pub date: NaiveDate,
    /// New nominal annual rate in percent
    pub new_rate: f64,
}

/// Core loan definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Principal borrowed
    pub loan_amount: f64,

    /// Nominal annual rate in percent (7.5 = 7.5%)
    pub interest_rate: f64,

    pub loan_term: LoanTerm,

    pub installment_type: InstallmentType,

    /// Date of the first installment
    pub start_date: NaiveDate,

    #[serde(default)]
    pub interest_rate_changes: Vec<InterestRateChange>,
}

impl MortgageInput {
    pub fn total_months(&self) -> u32 {
        self.loan_term.total_months()
    }

    pub fn validate(&self) -> EngineResult<()> {
        require_positive("loan_amount", self.loan_amount)?;
        validate_rate("interest_rate", self.interest_rate)?;
        self.loan_term.validate("loan_term")?;
        for change in &self.interest_rate_changes {
            validate_rate("interest_rate_changes.new_rate", change.new_rate)?;
        }
        Ok(())
    }
}

fn validate_rate(field: &str, rate: f64) -> EngineResult<()> {
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(EngineError::validation(field, format!("must be between 0 and 100 percent, got {}", rate)));
    }
    Ok(())
}

/// One-time extra payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overpayment {
    pub date: NaiveDate,
    pub amount: f64,
}

impl Overpayment {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Cadence of a cyclic overpayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl Frequency {
    /// Step between payments in months
    pub fn months(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Semiannually => 6,
            Frequency::Annually => 12,
        }
    }
}

/// Recurring extra payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclicOverpayment {
    pub amount: f64,
    pub frequency: Frequency,
    /// Defaults to the loan start when absent
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// What an overpayment does to the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentEffect {
    /// Keep the installment, finish earlier
    ReducePeriod,
    /// Keep the term, recalculate a lower installment
    ReduceInstallment,
    /// Lower the installment and redirect the difference into extra principal
    ProgressiveOverpayment,
}

impl OverpaymentEffect {
    pub const ALL: [OverpaymentEffect; 3] = [
        OverpaymentEffect::ReducePeriod,
        OverpaymentEffect::ReduceInstallment,
        OverpaymentEffect::ProgressiveOverpayment,
    ];

    /// Installment is recomputed against the remaining debt and term
    pub fn recalculates_installment(&self) -> bool {
        matches!(self, OverpaymentEffect::ReduceInstallment | OverpaymentEffect::ProgressiveOverpayment)
    }

    /// Savings report a term reduction
    pub fn shortens_term(&self) -> bool {
        matches!(self, OverpaymentEffect::ReducePeriod | OverpaymentEffect::ProgressiveOverpayment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverpaymentEffect::ReducePeriod => "reduce_period",
            OverpaymentEffect::ReduceInstallment => "reduce_installment",
            OverpaymentEffect::ProgressiveOverpayment => "progressive_overpayment",
        }
    }
}

/// Full amortization request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationParams {
    pub mortgage_input: MortgageInput,

    #[serde(default)]
    pub overpayments: Vec<Overpayment>,

    #[serde(default)]
    pub cyclic_overpayment: Option<CyclicOverpayment>,

    pub overpayment_effect: OverpaymentEffect,
}

impl CalculationParams {
    pub fn new(mortgage_input: MortgageInput, overpayment_effect: OverpaymentEffect) -> Self {
        Self {
            mortgage_input,
            overpayments: Vec::new(),
            cyclic_overpayment: None,
            overpayment_effect,
        }
    }

    pub fn with_overpayment(mut self, overpayment: Overpayment) -> Self {
        self.overpayments.push(overpayment);
        self
    }

    pub fn with_cyclic(mut self, cyclic: CyclicOverpayment) -> Self {
        self.cyclic_overpayment = Some(cyclic);
        self
    }

    /// Same request under a different effect
    pub fn with_effect(&self, effect: OverpaymentEffect) -> Self {
        Self {
            overpayment_effect: effect,
            ..self.clone()
        }
    }

    pub fn has_overpayments(&self) -> bool {
        !self.overpayments.is_empty() || self.cyclic_overpayment.is_some()
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.mortgage_input.validate()?;

        for overpayment in &self.overpayments {
            require_positive("overpayments.amount", overpayment.amount)?;
        }

        if let Some(cyclic) = &self.cyclic_overpayment {
            require_positive("cyclic_overpayment.amount", cyclic.amount)?;
            if let (Some(start), Some(end)) = (cyclic.start_date, cyclic.end_date) {
                if end < start {
                    return Err(EngineError::validation(
                        "cyclic_overpayment.end_date",
                        "must not be earlier than start_date",
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MortgageInput {
        MortgageInput {
            loan_amount: 300_000.0,
            interest_rate: 7.5,
            loan_term: LoanTerm::new(25, 0),
            installment_type: InstallmentType::Equal,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            interest_rate_changes: Vec::new(),
        }
    }

    #[test]
    fn test_loan_term_normalization() {
        assert_eq!(LoanTerm::new(25, 6).total_months(), 306);
        assert_eq!(LoanTerm::from_months(189), LoanTerm::new(15, 9));
    }

    #[test]
    fn test_loan_term_ranges() {
        assert!(LoanTerm::new(35, 11).validate("t").is_ok());
        assert!(LoanTerm::new(36, 0).validate("t").is_err());
        assert!(LoanTerm::new(10, 12).validate("t").is_err());
        assert!(LoanTerm::new(0, 0).validate("t").is_err());
    }

    #[test]
    fn test_mortgage_input_validation() {
        assert!(input().validate().is_ok());

        let mut bad = input();
        bad.loan_amount = 0.0;
        assert!(matches!(bad.validate(), Err(EngineError::Validation { field, .. }) if field == "loan_amount"));

        let mut bad = input();
        bad.interest_rate = 100.5;
        assert!(bad.validate().is_err());

        let mut zero_rate = input();
        zero_rate.interest_rate = 0.0;
        assert!(zero_rate.validate().is_ok());
    }

    #[test]
    fn test_params_validation_covers_overpayments() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let params = CalculationParams::new(input(), OverpaymentEffect::ReducePeriod)
            .with_overpayment(Overpayment::new(date, -10.0));
        assert!(params.validate().is_err());

        let params = CalculationParams::new(input(), OverpaymentEffect::ReducePeriod).with_cyclic(CyclicOverpayment {
            amount: 500.0,
            frequency: Frequency::Monthly,
            start_date: Some(date),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_effect_flags() {
        assert!(!OverpaymentEffect::ReducePeriod.recalculates_installment());
        assert!(OverpaymentEffect::ReduceInstallment.recalculates_installment());
        assert!(OverpaymentEffect::ProgressiveOverpayment.recalculates_installment());
        assert!(!OverpaymentEffect::ReduceInstallment.shortens_term());
        assert_eq!(Frequency::Semiannually.months(), 6);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "mortgage_input": {
                "loan_amount": 300000,
                "interest_rate": 7.5,
                "loan_term": { "years": 25, "months": 0 },
                "installment_type": "equal",
                "start_date": "2024-01-01"
            },
            "cyclic_overpayment": { "amount": 500, "frequency": "quarterly" },
            "overpayment_effect": "progressive_overpayment"
        }"#;
        let params: CalculationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.overpayment_effect, OverpaymentEffect::ProgressiveOverpayment);
        assert!(params.overpayments.is_empty());
        assert_eq!(params.cyclic_overpayment.unwrap().frequency, Frequency::Quarterly);
        assert!(params.mortgage_input.interest_rate_changes.is_empty());
    }
}
