//! Month-by-month amortization under overpayment strategies

mod overpayments;
mod rates;
mod state;
mod schedule;
mod engine;

pub use overpayments::{expand_overpayments, is_cyclic_period, OverpaymentPlan};
pub use rates::RateTimeline;
pub use state::ScenarioState;
pub use schedule::{CalculationResult, InstallmentDetails, Savings, ScenarioResult, ScenarioSummary};
pub use engine::{compute_amortization, AmortizationEngine};
