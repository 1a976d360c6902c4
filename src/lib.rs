//! Mortgage Calculator - amortization and refinancing engine
//!
//! This library provides:
//! - Month-by-month amortization with daily-prorated interest
//! - One-time, cyclic and progressive overpayment strategies
//! - Refinance comparison (status quo, lower installment, shorter term)
//! - Batch and multi-strategy execution
//!
//! All calculations are pure functions of their inputs; logging is injected
//! through [`logging::CalcLog`].

pub mod error;
pub mod calendar;
pub mod annuity;
pub mod logging;
pub mod config;
pub mod loan;
pub mod amortization;
pub mod refinance;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use config::EngineConfig;
pub use loan::{CalculationParams, InstallmentType, LoanTerm, MortgageInput, OverpaymentEffect};
pub use amortization::{compute_amortization, AmortizationEngine, CalculationResult};
pub use refinance::{compute_refinance, RefinanceEngine, RefinanceInput, RefinanceResult};
pub use scenario::ScenarioRunner;
