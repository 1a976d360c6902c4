//! Refinance inputs and results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, EngineError, EngineResult};
use crate::loan::{InstallmentType, LoanTerm};

/// How a refinance schedule accrues interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestConvention {
    /// annual_rate / 12 every period
    #[default]
    AverageMonth,
    /// annual_rate / 365 times the calendar days between anchored payment dates
    ExactDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// Flat amount
    Amount,
    /// Percent of a base amount
    Percentage,
}

/// Fee given either as a flat amount or as a percentage of a base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    #[serde(rename = "type")]
    pub commission_type: CommissionType,
    pub value: f64,
}

impl Commission {
    pub fn amount(value: f64) -> Self {
        Self { commission_type: CommissionType::Amount, value }
    }

    pub fn percentage(value: f64) -> Self {
        Self { commission_type: CommissionType::Percentage, value }
    }

    /// Fee in currency units against `base`
    pub fn resolve(&self, base: f64) -> f64 {
        match self.commission_type {
            CommissionType::Amount => self.value,
            CommissionType::Percentage => base * self.value / 100.0,
        }
    }
}

/// Existing loan and the offered rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceBasicInput {
    pub current_loan_balance: f64,
    pub current_remaining_period: LoanTerm,
    /// Percent
    pub current_interest_rate: f64,
    /// Percent
    pub new_interest_rate: f64,
}

/// New loan structure and fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceAdvancedInput {
    #[serde(default)]
    pub original_loan_amount: Option<f64>,

    /// Start of the original loan, `YYYY-MM-DD`
    #[serde(default)]
    pub start_date: Option<String>,

    pub current_installment_type: InstallmentType,

    #[serde(default)]
    pub original_commission: Option<Commission>,

    /// Informational; variant A recomputes its own installment
    #[serde(default)]
    pub current_monthly_installment: Option<f64>,

    /// `YYYY-MM-DD`
    pub refinance_date: String,

    pub new_loan_amount: f64,
    pub new_loan_term: LoanTerm,
    pub new_installment_type: InstallmentType,
    pub new_loan_commission: Commission,
    pub early_repayment_fee: Commission,

    #[serde(default)]
    pub other_costs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub basic: RefinanceBasicInput,
    pub advanced: RefinanceAdvancedInput,
}

fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::validation(field, format!("'{}' is not a valid YYYY-MM-DD date", value)))
}

fn validate_rate(field: &str, rate: f64) -> EngineResult<()> {
    require_positive(field, rate)?;
    if rate > 100.0 {
        return Err(EngineError::validation(field, "must not exceed 100 percent"));
    }
    Ok(())
}

fn validate_term(field: &str, term: &LoanTerm) -> EngineResult<()> {
    if term.total_months() == 0 {
        return Err(EngineError::validation(field, "must be a number greater than zero"));
    }
    term.validate(field)
}

impl RefinanceInput {
    /// Validate every field and return the parsed refinance date
    pub fn validate(&self) -> EngineResult<NaiveDate> {
        let basic = &self.basic;
        let advanced = &self.advanced;

        require_positive("current_loan_balance", basic.current_loan_balance)?;
        validate_term("current_remaining_period", &basic.current_remaining_period)?;
        validate_rate("current_interest_rate", basic.current_interest_rate)?;
        validate_rate("new_interest_rate", basic.new_interest_rate)?;
        require_positive("new_loan_amount", advanced.new_loan_amount)?;
        validate_term("new_loan_term", &advanced.new_loan_term)?;

        require_non_negative("new_loan_commission", advanced.new_loan_commission.value)?;
        require_non_negative("early_repayment_fee", advanced.early_repayment_fee.value)?;
        if let Some(commission) = &advanced.original_commission {
            require_non_negative("original_commission", commission.value)?;
        }
        if let Some(amount) = advanced.original_loan_amount {
            require_positive("original_loan_amount", amount)?;
        }
        if let Some(costs) = advanced.other_costs {
            require_non_negative("other_costs", costs)?;
        }

        let refinance_date = parse_date("refinance_date", &advanced.refinance_date)?;
        if let Some(start) = self.original_start_date()? {
            if start > refinance_date {
                return Err(EngineError::validation("start_date", "must not be after the refinance date"));
            }
        }
        Ok(refinance_date)
    }

    pub fn refinance_date(&self) -> EngineResult<NaiveDate> {
        parse_date("refinance_date", &self.advanced.refinance_date)
    }

    /// Start of the original loan, when given
    pub fn original_start_date(&self) -> EngineResult<Option<NaiveDate>> {
        self.advanced
            .start_date
            .as_deref()
            .map(|value| parse_date("start_date", value))
            .transpose()
    }

    pub fn remaining_months(&self) -> u32 {
        self.basic.current_remaining_period.total_months()
    }

    pub fn new_term_months(&self) -> u32 {
        self.advanced.new_loan_term.total_months()
    }
}

/// Single payment of a refinance schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceInstallment {
    pub installment_number: u32,
    pub date: NaiveDate,
    /// principal + interest
    pub amount: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
    /// Calendar days accrued; exact-day convention only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_in_period: Option<i64>,
}

/// Headline figures of one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceComparison {
    pub monthly_installment: f64,
    pub loan_term_months: u32,
    pub total_amount: f64,
    pub total_interest: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_refund: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinancing_costs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_benefit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payback_period_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceVariant {
    pub comparison: RefinanceComparison,
    pub schedule: Vec<RefinanceInstallment>,
}

/// A: keep the current loan. B: refinance at the new term.
/// C: refinance at the shortest term within the installment tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceResult {
    pub variant_a: RefinanceVariant,
    pub variant_b: RefinanceVariant,
    pub variant_c: RefinanceVariant,
}
