//! Run amortizations for a JSON array of inputs in parallel
//!
//! Usage: run_batch <inputs.json> [output.csv]
//!
//! Writes one summary row per input (baseline vs. overpayment totals)

use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Instant;

use mortgage_calculator::loan::load_params_batch;
use mortgage_calculator::ScenarioRunner;

#[derive(Debug, serde::Serialize)]
struct SummaryRow {
    index: usize,
    status: String,
    base_total_payment: Option<String>,
    base_total_interest: Option<String>,
    base_months: Option<u32>,
    overpayment_total_payment: Option<String>,
    overpayment_total_interest: Option<String>,
    overpayment_months: Option<u32>,
    interest_saved: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let input_path = args.get(1).ok_or_else(|| anyhow!("usage: run_batch <inputs.json> [output.csv]"))?;
    let output_path = args.get(2).map(String::as_str).unwrap_or("batch_summary.csv");

    let start = Instant::now();
    let batch = load_params_batch(input_path).map_err(|e| anyhow!("{}: {}", input_path, e))?;
    println!("Loaded {} inputs in {:?}", batch.len(), start.elapsed());

    let calc_start = Instant::now();
    let results = ScenarioRunner::new().run_batch(&batch);
    println!("Calculations complete in {:?}", calc_start.elapsed());

    let mut writer = csv::Writer::from_path(output_path).with_context(|| format!("creating {}", output_path))?;
    let mut failures = 0;
    for (index, result) in results.iter().enumerate() {
        let row = match result {
            Ok(result) => {
                let base = &result.base_scenario;
                let over = &result.overpayment_scenario;
                SummaryRow {
                    index,
                    status: "ok".to_string(),
                    base_total_payment: Some(format!("{:.2}", base.summary.total_payment)),
                    base_total_interest: Some(format!("{:.2}", base.summary.total_interest)),
                    base_months: Some(base.term_months()),
                    overpayment_total_payment: Some(format!("{:.2}", over.summary.total_payment)),
                    overpayment_total_interest: Some(format!("{:.2}", over.summary.total_interest)),
                    overpayment_months: Some(over.term_months()),
                    interest_saved: Some(format!("{:.2}", result.savings.interest_amount)),
                }
            }
            Err(err) => {
                failures += 1;
                log::warn!("input {} rejected: {}", index, err);
                SummaryRow {
                    index,
                    status: err.to_string(),
                    base_total_payment: None,
                    base_total_interest: None,
                    base_months: None,
                    overpayment_total_payment: None,
                    overpayment_total_interest: None,
                    overpayment_months: None,
                    interest_saved: None,
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Summary written to {} ({} ok, {} rejected)", output_path, results.len() - failures, failures);
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
