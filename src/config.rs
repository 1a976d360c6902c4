//! Engine configuration
//!
//! Every field has a named default; a JSON file may override any subset.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::refinance::InterestConvention;

/// Allowed increase (currency units) of the Variant C installment over the
/// current installment
pub const DEFAULT_INSTALLMENT_TOLERANCE: f64 = 30.0;

/// Shortest term TermSearch will propose
pub const DEFAULT_MIN_TERM_MONTHS: u32 = 12;

/// Extra iterations allowed beyond the nominal term before a loop is aborted
pub const DEFAULT_ITERATION_SAFETY_MARGIN: u32 = 120;

/// Payment day used by the exact-day convention
pub const DEFAULT_PAYMENT_DAY: u32 = 15;

/// Progressive vs reduce-period total payment difference that triggers a warning
pub const DEFAULT_PROGRESSIVE_DIVERGENCE_LIMIT: f64 = 1.0;

fn default_installment_tolerance() -> f64 { DEFAULT_INSTALLMENT_TOLERANCE }
fn default_min_term_months() -> u32 { DEFAULT_MIN_TERM_MONTHS }
fn default_iteration_safety_margin() -> u32 { DEFAULT_ITERATION_SAFETY_MARGIN }
fn default_payment_day() -> u32 { DEFAULT_PAYMENT_DAY }
fn default_divergence_limit() -> f64 { DEFAULT_PROGRESSIVE_DIVERGENCE_LIMIT }

/// Tunable parameters shared by both engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Variant C: max installment = current installment + tolerance
    #[serde(default = "default_installment_tolerance")]
    pub installment_tolerance: f64,

    /// TermSearch lower bound (months)
    #[serde(default = "default_min_term_months")]
    pub min_term_months: u32,

    /// Iteration guard margin on top of the scheduled term
    #[serde(default = "default_iteration_safety_margin")]
    pub iteration_safety_margin: u32,

    /// Day of month payments are anchored to under the exact-day convention
    #[serde(default = "default_payment_day")]
    pub payment_day_of_month: u32,

    /// Interest convention used to build refinance variant schedules
    #[serde(default)]
    pub refinance_convention: InterestConvention,

    /// Threshold for the progressive overpayment cross-check warning
    #[serde(default = "default_divergence_limit")]
    pub progressive_divergence_limit: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            installment_tolerance: DEFAULT_INSTALLMENT_TOLERANCE,
            min_term_months: DEFAULT_MIN_TERM_MONTHS,
            iteration_safety_margin: DEFAULT_ITERATION_SAFETY_MARGIN,
            payment_day_of_month: DEFAULT_PAYMENT_DAY,
            refinance_convention: InterestConvention::default(),
            progressive_divergence_limit: DEFAULT_PROGRESSIVE_DIVERGENCE_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.installment_tolerance.is_finite() || self.installment_tolerance < 0.0 {
            return Err(EngineError::validation(
                "installment_tolerance",
                "must be a non-negative number",
            ));
        }
        if self.min_term_months == 0 {
            return Err(EngineError::validation("min_term_months", "must be at least one month"));
        }
        if !(1..=31).contains(&self.payment_day_of_month) {
            return Err(EngineError::validation("payment_day_of_month", "must be between 1 and 31"));
        }
        if !self.progressive_divergence_limit.is_finite() || self.progressive_divergence_limit < 0.0 {
            return Err(EngineError::validation(
                "progressive_divergence_limit",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Upper bound on loop iterations for a schedule of `total_months`
    pub fn iteration_cap(&self, total_months: u32) -> u32 {
        total_months.saturating_add(self.iteration_safety_margin)
    }
}
