//! Compare the three overpayment effects for one input
//!
//! Usage: compare_strategies <params.json>

use anyhow::{anyhow, Result};
use std::env;

use mortgage_calculator::loan::load_params;
use mortgage_calculator::ScenarioRunner;

fn main() -> Result<()> {
    env_logger::init();

    let path = env::args().nth(1).ok_or_else(|| anyhow!("usage: compare_strategies <params.json>"))?;
    let params = load_params(&path).map_err(|e| anyhow!("{}: {}", path, e))?;

    let results = ScenarioRunner::new().run_effects(&params)?;

    let baseline = results
        .first()
        .map(|(_, r)| r.base_scenario.summary)
        .ok_or_else(|| anyhow!("no results"))?;
    println!(
        "Baseline: {:.2} paid, {:.2} interest, {} months\n",
        baseline.total_payment,
        baseline.total_interest,
        baseline.loan_term.total_months(),
    );

    println!(
        "{:<26} {:>14} {:>14} {:>8} {:>14} {:>12}",
        "Effect", "Total paid", "Interest", "Months", "Saved", "Last inst."
    );
    println!("{}", "-".repeat(93));
    for (effect, result) in &results {
        let scenario = &result.overpayment_scenario;
        let last = scenario.installments.last().map(|i| i.total_amount).unwrap_or(0.0);
        println!(
            "{:<26} {:>14.2} {:>14.2} {:>8} {:>14.2} {:>12.2}",
            effect.as_str(),
            scenario.summary.total_payment,
            scenario.summary.total_interest,
            scenario.term_months(),
            result.savings.interest_amount,
            last,
        );
    }
    Ok(())
}
