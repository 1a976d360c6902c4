//! Refinance engine: variants A, B and C for one refinance request

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::logging::{LogFacade, SharedLog};

use super::costs::{commission_refund, payback_period, refinancing_costs};
use super::schedule::{LoanSchedule, ScheduleGenerator};
use super::term_search::shortest_term_within_limit;
use super::types::{RefinanceComparison, RefinanceInput, RefinanceResult, RefinanceVariant};

const LOG_TARGET: &str = "mortgage_calculator::refinance";

/// Costs shared by variants B and C
#[derive(Debug, Clone, Copy)]
struct RefinanceCosts {
    refinancing_costs: f64,
    commission_refund: f64,
}

impl RefinanceCosts {
    fn net_cost(&self) -> f64 {
        self.refinancing_costs - self.commission_refund
    }
}

pub struct RefinanceEngine {
    config: EngineConfig,
    log: SharedLog,
}

impl Default for RefinanceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RefinanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            log: LogFacade::shared(LOG_TARGET),
        }
    }

    pub fn with_log(mut self, log: SharedLog) -> Self {
        self.log = log;
        self
    }

    fn generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::new(self.config.refinance_convention).with_payment_day(self.config.payment_day_of_month)
    }

    pub fn compute(&self, input: &RefinanceInput) -> EngineResult<RefinanceResult> {
        let refinance_date = input.validate()?;
        let original_start = input.original_start_date()?;
        let basic = &input.basic;
        let advanced = &input.advanced;

        self.log.debug(format_args!(
            "refinance start: balance={:.2} remaining={}m {}% -> {}% new amount={:.2} new term={}m",
            basic.current_loan_balance,
            input.remaining_months(),
            basic.current_interest_rate,
            basic.new_interest_rate,
            advanced.new_loan_amount,
            input.new_term_months(),
        ));

        let generator = self.generator();

        let current = generator.generate(
            basic.current_loan_balance,
            basic.current_interest_rate / 100.0,
            input.remaining_months(),
            advanced.current_installment_type,
            refinance_date,
        )?;
        let variant_a_comparison = current.comparison();

        let costs = RefinanceCosts {
            refinancing_costs: refinancing_costs(input),
            commission_refund: commission_refund(input, refinance_date, original_start),
        };

        let lower_installment = self.new_loan_schedule(input, input.new_term_months(), refinance_date)?;
        let variant_b = self.with_costs(lower_installment.clone(), &variant_a_comparison, costs);

        let variant_c = match self.shorter_term_variant(input, refinance_date, &variant_a_comparison, &lower_installment, costs) {
            Ok(variant) => variant,
            Err(err) => {
                self.log.warn(format_args!(
                    "variant C search failed ({}); falling back to the original {}m term",
                    err,
                    input.new_term_months(),
                ));
                Self::fallback_variant(lower_installment, costs)
            }
        };

        Ok(RefinanceResult {
            variant_a: current.into_variant(variant_a_comparison),
            variant_b,
            variant_c,
        })
    }

    fn new_loan_schedule(&self, input: &RefinanceInput, months: u32, refinance_date: NaiveDate) -> EngineResult<LoanSchedule> {
        self.generator().generate(
            input.advanced.new_loan_amount,
            input.basic.new_interest_rate / 100.0,
            months,
            input.advanced.new_installment_type,
            refinance_date,
        )
    }

    /// Attach costs, refund, benefit and payback measured against variant A
    fn with_costs(&self, schedule: LoanSchedule, current: &RefinanceComparison, costs: RefinanceCosts) -> RefinanceVariant {
        let mut comparison = schedule.comparison();
        let new_total_cost = comparison.total_amount + costs.net_cost();
        let monthly_savings = current.monthly_installment - comparison.monthly_installment;

        comparison.commission_refund = Some(costs.commission_refund);
        comparison.refinancing_costs = Some(costs.refinancing_costs);
        comparison.total_benefit = Some(current.total_amount - new_total_cost);
        comparison.payback_period_months = payback_period(costs.net_cost(), monthly_savings);
        schedule.into_variant(comparison)
    }

    /// Variant C: shortest term whose installment stays within the tolerance
    /// above the current installment
    fn shorter_term_variant(
        &self,
        input: &RefinanceInput,
        refinance_date: NaiveDate,
        current: &RefinanceComparison,
        original_term: &LoanSchedule,
        costs: RefinanceCosts,
    ) -> EngineResult<RefinanceVariant> {
        let new_term = input.new_term_months();
        let max_installment = current.monthly_installment + self.config.installment_tolerance;

        let found = shortest_term_within_limit(
            input.advanced.new_loan_amount,
            input.basic.new_interest_rate / 100.0,
            input.advanced.new_installment_type,
            max_installment,
            self.config.min_term_months,
            new_term,
        )?;

        let schedule = match found {
            Some(term) => {
                self.log.info(format_args!(
                    "variant C: {}m term fits installment limit {:.2} (original {}m)",
                    term, max_installment, new_term,
                ));
                self.new_loan_schedule(input, term, refinance_date)?
            }
            None => {
                self.log.info(format_args!(
                    "variant C: no term between {}m and {}m fits installment limit {:.2}; keeping original term",
                    self.config.min_term_months, new_term, max_installment,
                ));
                original_term.clone()
            }
        };

        let schedule = if found.is_some() && schedule.monthly_installment > max_installment {
            self.log.warn(format_args!(
                "variant C installment {:.2} exceeds limit {:.2}; keeping original term",
                schedule.monthly_installment, max_installment,
            ));
            original_term.clone()
        } else {
            schedule
        };

        Ok(self.with_costs(schedule, current, costs))
    }

    fn fallback_variant(schedule: LoanSchedule, costs: RefinanceCosts) -> RefinanceVariant {
        let mut comparison = schedule.comparison();
        comparison.commission_refund = Some(costs.commission_refund);
        comparison.refinancing_costs = Some(costs.refinancing_costs);
        comparison.total_benefit = Some(0.0);
        comparison.payback_period_months = Some(0);
        schedule.into_variant(comparison)
    }
}

/// Compute a refinance comparison with the default configuration
pub fn compute_refinance(input: &RefinanceInput) -> EngineResult<RefinanceResult> {
    RefinanceEngine::default().compute(input)
}
