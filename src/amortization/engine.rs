//! Amortization engine: baseline and overpayment scenarios for one loan

use crate::annuity::{equal_installment, first_decreasing_installment};
use crate::calendar::days_in_month;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::loan::{CalculationParams, InstallmentType, OverpaymentEffect};
use crate::logging::{LogFacade, SharedLog};

use super::overpayments::{expand_overpayments, is_cyclic_period, OverpaymentPlan};
use super::rates::RateTimeline;
use super::schedule::{CalculationResult, InstallmentDetails, Savings, ScenarioResult};
use super::state::ScenarioState;

const LOG_TARGET: &str = "mortgage_calculator::amortization";

/// Runs amortization scenarios. Holds no per-run state, so one engine can be
/// shared across threads.
pub struct AmortizationEngine {
    config: EngineConfig,
    log: SharedLog,
}

impl Default for AmortizationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AmortizationEngine {
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

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Baseline and overpayment scenarios plus the savings between them
    pub fn compute(&self, params: &CalculationParams) -> EngineResult<CalculationResult> {
        params.validate()?;

        let base_scenario = self.compute_scenario(params, false)?;
        // Overpayments never stretch the loan past the baseline payoff
        let horizon = base_scenario.term_months();
        let overpayment_scenario = self.simulate(params, true, horizon)?;

        if params.overpayment_effect == OverpaymentEffect::ProgressiveOverpayment && params.has_overpayments() {
            self.cross_check_progressive(params, &overpayment_scenario)?;
        }

        let savings = Savings::between(
            &base_scenario,
            &overpayment_scenario,
            params.overpayment_effect.shortens_term(),
        );

        Ok(CalculationResult {
            base_scenario,
            overpayment_scenario,
            savings,
        })
    }

    /// Simulate one scenario month by month
    pub fn compute_scenario(&self, params: &CalculationParams, include_overpayments: bool) -> EngineResult<ScenarioResult> {
        params.validate()?;
        self.simulate(params, include_overpayments, params.mortgage_input.total_months())
    }

    /// Month-by-month loop. `horizon` is the last period the schedule may
    /// reach; recalculated installments spread the debt over it.
    fn simulate(&self, params: &CalculationParams, include_overpayments: bool, horizon: u32) -> EngineResult<ScenarioResult> {
        let input = &params.mortgage_input;
        let effect = params.overpayment_effect;
        let principal = input.loan_amount;
        let total_months = input.total_months();
        let horizon = horizon.clamp(1, total_months.max(1));

        self.log.debug(format_args!(
            "scenario start: amount={:.2} rate={}% term={}m type={:?} effect={} overpayments={}",
            principal,
            input.interest_rate,
            total_months,
            input.installment_type,
            effect.as_str(),
            include_overpayments,
        ));

        let mut rates = RateTimeline::new(input.interest_rate, &input.interest_rate_changes);
        let plan = if include_overpayments {
            OverpaymentPlan::new(expand_overpayments(
                &params.overpayments,
                params.cyclic_overpayment.as_ref(),
                input.start_date,
                total_months,
                effect,
            ))
        } else {
            OverpaymentPlan::default()
        };
        let progressive = match (include_overpayments, effect, params.cyclic_overpayment.as_ref()) {
            (true, OverpaymentEffect::ProgressiveOverpayment, Some(cyclic)) => Some(cyclic),
            _ => None,
        };
        let recalculating_mode = include_overpayments && effect.recalculates_installment();

        // Installment against the original principal and term, before any overpayment
        let initial_monthly_rate = input.interest_rate / 100.0 / 12.0;
        let base_installment = match input.installment_type {
            InstallmentType::Equal => equal_installment(principal, initial_monthly_rate, total_months),
            InstallmentType::Decreasing => first_decreasing_installment(principal, initial_monthly_rate, total_months),
        };

        let iteration_cap = self.config.iteration_cap(total_months);
        let mut state = ScenarioState::from_input(input);
        let mut result = ScenarioResult::new();

        while state.is_active() {
            self.check_iteration_guard(&state, iteration_cap)?;

            let rate = rates.advance_to(state.current_date);
            let monthly_rate = rate / 100.0 / 12.0;
            let debt = state.remaining_debt;

            let interest_amount = debt * (rate / 100.0 / 365.0) * days_in_month(state.current_date) as f64;
            if !interest_amount.is_finite() {
                return Err(EngineError::computation("amortization", "interest is not a finite number"));
            }

            let recalculate = recalculating_mode && state.recalculating;
            let periods_left = state
                .months_remaining
                .min((horizon + 1).saturating_sub(state.installment_number))
                .max(1);
            let mut principal_amount = match input.installment_type {
                InstallmentType::Equal => {
                    let installment = if recalculate {
                        equal_installment(debt, monthly_rate, periods_left)
                    } else {
                        equal_installment(principal, monthly_rate, total_months)
                    };
                    (installment - interest_amount).max(0.0).min(debt)
                }
                InstallmentType::Decreasing => {
                    if recalculate {
                        debt / periods_left as f64
                    } else {
                        (principal / total_months as f64).min(debt)
                    }
                }
            };
            // Daily interest drifts from the monthly annuity; the last scheduled period settles it
            if state.is_final_period() || state.installment_number >= horizon {
                principal_amount = debt;
            }
            let nominal_installment = principal_amount + interest_amount;

            let mut one_time_due = 0.0;
            let mut progressive_due = 0.0;
            if include_overpayments {
                one_time_due = plan.for_month(state.current_date);
                if let Some(cyclic) = progressive {
                    if is_cyclic_period(state.current_date, cyclic, input.start_date) {
                        progressive_due = cyclic.amount + (base_installment - nominal_installment).max(0.0);
                    }
                }
            }

            // Payoff month: the overpayment goes first, regular principal covers the rest
            let overpayment_amount = (one_time_due + progressive_due).min(debt);
            let after_overpayment = debt - overpayment_amount;
            principal_amount = principal_amount.min(after_overpayment);
            let remaining_debt = (after_overpayment - principal_amount).max(0.0);
            let total_amount = principal_amount + interest_amount;

            let one_time_applied = one_time_due.min(overpayment_amount);
            let progressive_applied = overpayment_amount - one_time_applied;

            if overpayment_amount > 0.0 {
                self.log.debug(format_args!(
                    "installment {} ({}): overpayment {:.2} applied, debt {:.2} -> {:.2}",
                    state.installment_number, state.current_date, overpayment_amount, debt, remaining_debt,
                ));
                state.recalculating = true;
            }

            result.add_installment(InstallmentDetails {
                installment_number: state.installment_number,
                date: state.current_date,
                total_amount,
                principal_amount,
                interest_amount,
                overpayment_amount,
                remaining_debt,
                one_time_overpayment: (one_time_applied > 0.0).then_some(one_time_applied),
                progressive_overpayment: (progressive_applied > 0.0).then_some(progressive_applied),
            });

            state.remaining_debt = remaining_debt;
            state.record_payment(total_amount, overpayment_amount, interest_amount);
            state.advance_month();
        }

        result.summary.total_payment = state.total_payment;
        result.summary.total_interest = state.total_interest;
        Ok(result)
    }

    fn check_iteration_guard(&self, state: &ScenarioState, iteration_cap: u32) -> EngineResult<()> {
        if state.installment_number <= iteration_cap {
            return Ok(());
        }
        self.log.warn(format_args!(
            "iteration guard tripped after {} periods (debt {:.2} left)",
            iteration_cap, state.remaining_debt,
        ));
        Err(EngineError::computation(
            "amortization",
            format!("schedule exceeded {} periods", iteration_cap),
        ))
    }

    /// Compare the progressive result with the reduce-period strategy on the
    /// same input. Diagnostic only; the result is never altered.
    fn cross_check_progressive(&self, params: &CalculationParams, progressive: &ScenarioResult) -> EngineResult<()> {
        let reduce_period = self.compute_scenario(&params.with_effect(OverpaymentEffect::ReducePeriod), true)?;
        let difference = (progressive.summary.total_payment - reduce_period.summary.total_payment).abs();
        if difference > self.config.progressive_divergence_limit {
            self.log.warn(format_args!(
                "progressive total {:.2} differs from reduce_period total {:.2} by {:.2}",
                progressive.summary.total_payment, reduce_period.summary.total_payment, difference,
            ));
        }
        Ok(())
    }
}

/// Compute an amortization with the default configuration
pub fn compute_amortization(params: &CalculationParams) -> EngineResult<CalculationResult> {
    AmortizationEngine::default().compute(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{CyclicOverpayment, Frequency, InterestRateChange, LoanTerm, MortgageInput, Overpayment};
    use crate::logging::{MemoryLog, Silent};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_input(installment_type: InstallmentType) -> MortgageInput {
        MortgageInput {
            loan_amount: 300_000.0,
            interest_rate: 7.5,
            loan_term: LoanTerm::new(25, 0),
            installment_type,
            start_date: date(2024, 1, 1),
            interest_rate_changes: Vec::new(),
        }
    }

    fn params(effect: OverpaymentEffect) -> CalculationParams {
        CalculationParams::new(reference_input(InstallmentType::Equal), effect)
    }

    fn monthly_500() -> CyclicOverpayment {
        CyclicOverpayment {
            amount: 500.0,
            frequency: Frequency::Monthly,
            start_date: None,
            end_date: None,
        }
    }

    fn engine() -> AmortizationEngine {
        AmortizationEngine::default().with_log(Silent::shared())
    }

    fn assert_schedule_invariants(scenario: &ScenarioResult) {
        let mut previous_debt = f64::INFINITY;
        for (i, row) in scenario.installments.iter().enumerate() {
            assert_eq!(row.installment_number, i as u32 + 1);
            assert!(row.remaining_debt >= 0.0);
            assert!(row.remaining_debt <= previous_debt);
            assert!(row.principal_amount >= 0.0);
            assert_abs_diff_eq!(row.total_amount, row.principal_amount + row.interest_amount, epsilon = 1e-9);
            previous_debt = row.remaining_debt;
        }
        assert_abs_diff_eq!(scenario.final_debt(), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_baseline_reference_loan() {
        let result = engine().compute(&params(OverpaymentEffect::ReducePeriod)).unwrap();
        let base = &result.base_scenario;

        assert_eq!(base.installments.len(), 300);
        assert!(base.summary.total_interest > 300_000.0 && base.summary.total_interest < 600_000.0);
        assert_relative_eq!(base.summary.total_interest, 365_849.36, epsilon = 0.5);
        assert_eq!(base.summary.total_payment, result.overpayment_scenario.summary.total_payment);
        assert_eq!(base.summary.loan_term, LoanTerm::new(25, 0));

        // January: 31 days of daily-prorated interest
        let first = &base.installments[0];
        assert_abs_diff_eq!(first.interest_amount, 1910.96, epsilon = 0.01);
        assert_abs_diff_eq!(first.total_amount, 2216.97, epsilon = 0.01);
        assert_schedule_invariants(base);
    }

    #[test]
    fn test_interest_follows_days_in_month() {
        let input = MortgageInput {
            loan_term: LoanTerm::new(1, 0),
            ..reference_input(InstallmentType::Decreasing)
        };
        let result = engine()
            .compute_scenario(&CalculationParams::new(input, OverpaymentEffect::ReducePeriod), false)
            .unwrap();
        let jan = &result.installments[0];
        let feb = &result.installments[1];
        assert_abs_diff_eq!(jan.interest_amount, 300_000.0 * 0.075 / 365.0 * 31.0, epsilon = 1e-9);
        // 2024 is a leap year
        assert_abs_diff_eq!(feb.interest_amount, 275_000.0 * 0.075 / 365.0 * 29.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_overpayment_invariance() {
        for effect in OverpaymentEffect::ALL {
            for installment_type in [InstallmentType::Equal, InstallmentType::Decreasing] {
                let params = CalculationParams::new(reference_input(installment_type), effect);
                let result = engine().compute(&params).unwrap();
                assert_eq!(result.base_scenario.summary, result.overpayment_scenario.summary);
                assert_eq!(result.base_scenario.installments, result.overpayment_scenario.installments);
            }
        }
    }

    #[test]
    fn test_one_time_overpayment_reduce_period() {
        let params = params(OverpaymentEffect::ReducePeriod).with_overpayment(Overpayment::new(date(2024, 6, 1), 50_000.0));
        let result = engine().compute(&params).unwrap();
        let scenario = &result.overpayment_scenario;

        let june = scenario.installments.iter().find(|i| i.date == date(2024, 6, 1)).unwrap();
        assert_eq!(june.overpayment_amount, 50_000.0);
        assert_eq!(june.one_time_overpayment, Some(50_000.0));
        assert!(scenario.installments.len() < 300);
        assert_eq!(scenario.installments.len(), 199);

        let reduction = result.savings.time_reduction.unwrap();
        assert!(reduction.total_months() > 0);
        assert_eq!(reduction.total_months(), 101);
        assert!(result.savings.interest_amount > 0.0);
        assert_schedule_invariants(scenario);
    }

    #[test]
    fn test_monthly_cyclic_every_period_carries_overpayment() {
        let params = params(OverpaymentEffect::ReducePeriod).with_cyclic(monthly_500());
        let result = engine().compute(&params).unwrap();
        let scenario = &result.overpayment_scenario;

        assert_eq!(scenario.installments.len(), 189);
        assert_eq!(scenario.overpayment_periods(), scenario.installments.len());
        assert_schedule_invariants(scenario);
    }

    #[test]
    fn test_reduce_installment_keeps_term_and_lowers_installment() {
        let params = params(OverpaymentEffect::ReduceInstallment).with_overpayment(Overpayment::new(date(2024, 6, 1), 50_000.0));
        let result = engine().compute(&params).unwrap();
        let base = &result.base_scenario;
        let scenario = &result.overpayment_scenario;

        assert_eq!(scenario.installments.len(), base.installments.len());
        assert!(result.savings.time_reduction.is_none());
        // Recalculated from July onward
        assert_abs_diff_eq!(scenario.installments[6].total_amount, 1844.66, epsilon = 0.01);
        assert!(scenario.installments[6].total_amount < base.installments[6].total_amount);
        assert_schedule_invariants(scenario);
    }

    #[test]
    fn test_decreasing_reduce_installment() {
        let params = CalculationParams::new(reference_input(InstallmentType::Decreasing), OverpaymentEffect::ReduceInstallment)
            .with_overpayment(Overpayment::new(date(2024, 6, 1), 50_000.0));
        let scenario = engine().compute_scenario(&params, true).unwrap();

        assert_eq!(scenario.installments.len(), 300);
        assert_abs_diff_eq!(scenario.installments[5].remaining_debt, 244_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(scenario.installments[6].principal_amount, 244_000.0 / 294.0, epsilon = 1e-9);
        assert_schedule_invariants(&scenario);
    }

    #[test]
    fn test_overpayments_never_lengthen_term() {
        let plans = [
            params(OverpaymentEffect::ReducePeriod).with_cyclic(monthly_500()),
            params(OverpaymentEffect::ReduceInstallment).with_cyclic(monthly_500()),
            params(OverpaymentEffect::ProgressiveOverpayment).with_cyclic(monthly_500()),
            params(OverpaymentEffect::ProgressiveOverpayment).with_overpayment(Overpayment::new(date(2030, 3, 1), 20_000.0)),
        ];
        for params in plans {
            let result = engine().compute(&params).unwrap();
            assert!(result.overpayment_scenario.term_months() <= result.base_scenario.term_months());
            assert!(result.savings.interest_amount > 0.0);
            assert_schedule_invariants(&result.overpayment_scenario);
        }
    }

    #[test]
    fn test_overpayments_never_outlast_baseline_across_inputs() {
        let rate_change = InterestRateChange {
            date: date(2025, 3, 1),
            new_rate: 1.0,
        };
        for effect in OverpaymentEffect::ALL {
            for installment_type in [InstallmentType::Equal, InstallmentType::Decreasing] {
                for rate in [0.0, 3.3, 18.0] {
                    for term in [LoanTerm::new(30, 11), LoanTerm::new(10, 0)] {
                        for with_change in [false, true] {
                            for with_cyclic in [false, true] {
                                let mut input = MortgageInput {
                                    interest_rate: rate,
                                    loan_term: term,
                                    ..reference_input(installment_type)
                                };
                                if with_change {
                                    input.interest_rate_changes.push(rate_change);
                                }
                                let mut params = CalculationParams::new(input, effect)
                                    .with_overpayment(Overpayment::new(date(2024, 6, 1), 20_000.0));
                                if with_cyclic {
                                    params = params.with_cyclic(monthly_500());
                                }

                                let result = engine().compute(&params).unwrap();
                                let base = result.base_scenario.term_months();
                                let over = result.overpayment_scenario.term_months();
                                assert!(
                                    over <= base,
                                    "{} {:?} rate={} term={:?} change={} cyclic={}: {} > {}",
                                    effect.as_str(), installment_type, rate, term, with_change, with_cyclic, over, base,
                                );
                                if let Some(reduction) = result.savings.time_reduction {
                                    assert_eq!(reduction.total_months(), base - over);
                                }
                                assert_schedule_invariants(&result.base_scenario);
                                assert_schedule_invariants(&result.overpayment_scenario);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_high_rate_reduce_installment_stops_with_baseline() {
        // 31-day months accrue more than the fixed annuity covers
        let input = MortgageInput {
            interest_rate: 18.0,
            loan_term: LoanTerm::new(30, 11),
            ..reference_input(InstallmentType::Equal)
        };
        let params = CalculationParams::new(input, OverpaymentEffect::ReduceInstallment)
            .with_overpayment(Overpayment::new(date(2024, 6, 1), 20_000.0));
        let result = engine().compute(&params).unwrap();

        assert!(result.overpayment_scenario.term_months() <= result.base_scenario.term_months());
        assert!(result.savings.interest_amount > 0.0);
    }

    #[test]
    fn test_iteration_guard_returns_computation_error() {
        let log = Arc::new(MemoryLog::new());
        let engine = AmortizationEngine::default().with_log(log.clone());
        let input = reference_input(InstallmentType::Equal);
        let cap = engine.config().iteration_cap(input.total_months());
        let mut state = ScenarioState::from_input(&input);

        state.installment_number = cap;
        assert!(engine.check_iteration_guard(&state, cap).is_ok());

        state.installment_number = cap + 1;
        let err = engine.check_iteration_guard(&state, cap).unwrap_err();
        assert!(matches!(err, EngineError::Computation { .. }));
        assert!(log.contains(log::Level::Warn, "iteration guard"));
    }

    #[test]
    fn test_progressive_overpayment_redirects_difference() {
        let params = params(OverpaymentEffect::ProgressiveOverpayment).with_cyclic(monthly_500());
        let result = engine().compute(&params).unwrap();
        let scenario = &result.overpayment_scenario;

        assert_eq!(scenario.installments.len(), 189);
        assert!(result.savings.time_reduction.is_some());

        // First period follows the original schedule: no difference to redirect yet
        assert_abs_diff_eq!(scenario.installments[0].overpayment_amount, 500.0, epsilon = 1e-9);
        // Afterwards the lowered installment's difference is added on top
        let second = &scenario.installments[1];
        let base_installment = result.base_scenario.installments[0].total_amount;
        assert_abs_diff_eq!(
            second.overpayment_amount,
            500.0 + (base_installment - second.total_amount),
            epsilon = 1e-6
        );
        assert!(second.progressive_overpayment.is_some());
        assert_schedule_invariants(scenario);
    }

    #[test]
    fn test_progressive_applies_one_time_without_cyclic() {
        let params = params(OverpaymentEffect::ProgressiveOverpayment).with_overpayment(Overpayment::new(date(2024, 6, 1), 50_000.0));
        let scenario = engine().compute_scenario(&params, true).unwrap();
        let june = &scenario.installments[5];
        assert_eq!(june.overpayment_amount, 50_000.0);
        assert!(june.progressive_overpayment.is_none());
    }

    #[test]
    fn test_zero_rate_loan() {
        let mut input = reference_input(InstallmentType::Equal);
        input.interest_rate = 0.0;
        let scenario = engine()
            .compute_scenario(&CalculationParams::new(input, OverpaymentEffect::ReducePeriod), false)
            .unwrap();

        assert_eq!(scenario.installments.len(), 300);
        assert!(scenario.installments.iter().all(|i| i.interest_amount == 0.0));
        let principal: f64 = scenario.installments.iter().map(|i| i.principal_amount).sum();
        assert_eq!(principal, 300_000.0);
    }

    #[test]
    fn test_rate_change_lowers_interest() {
        let mut input = reference_input(InstallmentType::Equal);
        input.interest_rate_changes.push(InterestRateChange {
            date: date(2025, 1, 1),
            new_rate: 5.0,
        });
        let params = CalculationParams::new(input, OverpaymentEffect::ReducePeriod);
        let changed = engine().compute_scenario(&params, false).unwrap();
        let fixed = engine()
            .compute_scenario(&CalculationParams::new(reference_input(InstallmentType::Equal), OverpaymentEffect::ReducePeriod), false)
            .unwrap();

        assert_eq!(changed.installments[11].interest_amount, fixed.installments[11].interest_amount);
        assert!(changed.installments[12].interest_amount < fixed.installments[12].interest_amount);
        assert!(changed.summary.total_interest < fixed.summary.total_interest);
        assert_schedule_invariants(&changed);
    }

    #[test]
    fn test_invalid_input_is_validation_error() {
        let mut input = reference_input(InstallmentType::Equal);
        input.loan_amount = -1.0;
        let err = compute_amortization(&CalculationParams::new(input, OverpaymentEffect::ReducePeriod)).unwrap_err();
        assert!(err.is_validation());

        let mut input = reference_input(InstallmentType::Equal);
        input.interest_rate = 120.0;
        assert!(compute_amortization(&CalculationParams::new(input, OverpaymentEffect::ReducePeriod)).is_err());
    }

    #[test]
    fn test_deterministic_output() {
        let params = params(OverpaymentEffect::ProgressiveOverpayment).with_cyclic(monthly_500());
        let first = serde_json::to_string(&engine().compute(&params).unwrap()).unwrap();
        let second = serde_json::to_string(&engine().compute(&params).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_progressive_cross_check_is_logged() {
        let log = Arc::new(MemoryLog::new());
        let engine = AmortizationEngine::default().with_log(log.clone());
        let quarterly = CyclicOverpayment {
            frequency: Frequency::Quarterly,
            ..monthly_500()
        };
        engine
            .compute(&params(OverpaymentEffect::ProgressiveOverpayment).with_cyclic(quarterly))
            .unwrap();
        assert!(log.contains(log::Level::Warn, "reduce_period"));
    }
}
