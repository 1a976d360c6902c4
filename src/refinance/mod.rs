//! Refinancing comparison: status quo vs. lower installment vs. shorter term

mod types;
mod schedule;
mod term_search;
mod costs;
mod engine;

pub use types::{
    Commission, CommissionType, InterestConvention, RefinanceAdvancedInput, RefinanceBasicInput,
    RefinanceComparison, RefinanceInput, RefinanceInstallment, RefinanceResult, RefinanceVariant,
};
pub use schedule::{LoanSchedule, ScheduleGenerator};
pub use term_search::{shortest_term_bisect, shortest_term_within_limit, term_for_target_installment};
pub use costs::{commission_refund, payback_period, refinancing_costs};
pub use engine::{compute_refinance, RefinanceEngine};
