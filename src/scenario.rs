//! Scenario runner for batch and multi-strategy calculations
//!
//! Holds one configuration and logging handle, and runs independent inputs
//! through fresh engines, in parallel where inputs do not depend on each other.

use rayon::prelude::*;

use crate::amortization::{AmortizationEngine, CalculationResult};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::loan::{CalculationParams, OverpaymentEffect};
use crate::logging::{LogFacade, SharedLog};
use crate::refinance::{RefinanceEngine, RefinanceInput, RefinanceResult};

/// Runs amortization and refinance calculations under a shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_batch(&inputs);
/// let by_effect = runner.run_effects(&params)?;
/// ```
#[derive(Clone)]
pub struct ScenarioRunner {
    config: EngineConfig,
    log: SharedLog,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            log: LogFacade::shared("mortgage_calculator::scenario"),
        }
    }

    /// Load the configuration from a JSON file
    pub fn from_config_path(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(EngineConfig::from_json_path(path)?))
    }

    pub fn with_log(mut self, log: SharedLog) -> Self {
        self.log = log;
        self
    }

    fn amortization_engine(&self) -> AmortizationEngine {
        AmortizationEngine::new(self.config.clone()).with_log(self.log.clone())
    }

    fn refinance_engine(&self) -> RefinanceEngine {
        RefinanceEngine::new(self.config.clone()).with_log(self.log.clone())
    }

    pub fn run(&self, params: &CalculationParams) -> EngineResult<CalculationResult> {
        self.amortization_engine().compute(params)
    }

    /// Independent inputs in parallel; results keep the input order
    pub fn run_batch(&self, batch: &[CalculationParams]) -> Vec<EngineResult<CalculationResult>> {
        let engine = self.amortization_engine();
        batch.par_iter().map(|params| engine.compute(params)).collect()
    }

    /// Same input under every overpayment effect
    pub fn run_effects(&self, params: &CalculationParams) -> EngineResult<Vec<(OverpaymentEffect, CalculationResult)>> {
        let engine = self.amortization_engine();
        OverpaymentEffect::ALL[..]
            .par_iter()
            .map(|&effect| engine.compute(&params.with_effect(effect)).map(|result| (effect, result)))
            .collect()
    }

    pub fn run_refinance(&self, input: &RefinanceInput) -> EngineResult<RefinanceResult> {
        self.refinance_engine().compute(input)
    }

    pub fn run_refinance_batch(&self, batch: &[RefinanceInput]) -> Vec<EngineResult<RefinanceResult>> {
        let engine = self.refinance_engine();
        batch.par_iter().map(|input| engine.compute(input)).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable configuration for customization between runs
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
