//! Mortgage Calculator CLI
//!
//! Runs an amortization or refinance calculation from a JSON input file

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use mortgage_calculator::export::{write_amortization_csv, write_refinance_csv};
use mortgage_calculator::loan::{load_overpayments, load_params, load_refinance_input};
use mortgage_calculator::refinance::RefinanceVariant;
use mortgage_calculator::{CalculationResult, EngineConfig, EngineError, RefinanceResult, ScenarioRunner};

/// Mortgage amortization and refinancing calculator
#[derive(Parser)]
#[command(name = "mortgage", version, about = "Mortgage amortization and refinancing calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (JSON); defaults apply to missing fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the full result as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortization schedule with and without overpayments
    Amortize {
        /// Calculation parameters (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Extra one-time overpayments (CSV: date,amount)
        #[arg(long)]
        overpayments: Option<PathBuf>,

        /// Write both schedules to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compare the current loan with two refinancing variants
    Refinance {
        /// Refinance input (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Write the variant schedules to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Loaders report `Box<dyn Error>`; attach the path for the user
fn loaded<T>(result: Result<T, Box<dyn std::error::Error>>, path: &Path) -> Result<T> {
    result.map_err(|e| anyhow!("{}: {}", path.display(), e))
}

fn runner(config: Option<&Path>) -> Result<ScenarioRunner> {
    let config = match config {
        Some(path) => loaded(EngineConfig::from_json_path(path), path)?,
        None => EngineConfig::default(),
    };
    Ok(ScenarioRunner::with_config(config))
}

fn run(cli: Cli) -> Result<()> {
    let runner = runner(cli.config.as_deref())?;

    match cli.command {
        Commands::Amortize { input, overpayments, csv } => {
            let mut params = loaded(load_params(&input), &input)?;
            if let Some(path) = overpayments {
                params.overpayments.extend(loaded(load_overpayments(&path), &path)?);
            }

            let result = runner.run(&params)?;

            if let Some(path) = csv {
                loaded(write_amortization_csv(&path, &result), &path)?;
                log::info!("schedules written to {}", path.display());
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result).context("serializing result")?);
            } else {
                print_amortization(&result);
            }
        }
        Commands::Refinance { input, csv } => {
            let refinance = loaded(load_refinance_input(&input), &input)?;
            let result = runner.run_refinance(&refinance)?;

            if let Some(path) = csv {
                loaded(write_refinance_csv(&path, &result), &path)?;
                log::info!("schedules written to {}", path.display());
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result).context("serializing result")?);
            } else {
                print_refinance(&result);
            }
        }
    }

    Ok(())
}

fn print_amortization(result: &CalculationResult) {
    println!("{:<16} {:>16} {:>16} {:>10}", "Scenario", "Total paid", "Interest", "Term");
    println!("{}", "-".repeat(61));
    for (label, scenario) in [("Baseline", &result.base_scenario), ("Overpayments", &result.overpayment_scenario)] {
        let term = scenario.summary.loan_term;
        println!(
            "{:<16} {:>16.2} {:>16.2} {:>6}y {:>2}m",
            label, scenario.summary.total_payment, scenario.summary.total_interest, term.years, term.months,
        );
    }
    println!();
    println!("Savings: {:.2} total, {:.2} interest", result.savings.total_amount, result.savings.interest_amount);
    if let Some(reduction) = result.savings.time_reduction {
        println!("Term shortened by {}y {}m", reduction.years, reduction.months);
    }
}

fn print_refinance(result: &RefinanceResult) {
    println!(
        "{:<28} {:>12} {:>6} {:>14} {:>14} {:>12} {:>8}",
        "Variant", "Installment", "Term", "Total", "Interest", "Benefit", "Payback"
    );
    println!("{}", "-".repeat(100));
    let rows: [(&str, &RefinanceVariant); 3] = [
        ("A: keep current loan", &result.variant_a),
        ("B: lower installment", &result.variant_b),
        ("C: shorter term", &result.variant_c),
    ];
    for (label, variant) in rows {
        let c = &variant.comparison;
        let benefit = c.total_benefit.map(|b| format!("{:.2}", b)).unwrap_or_else(|| "-".to_string());
        let payback = c.payback_period_months.map(|m| format!("{}m", m)).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>12.2} {:>5}m {:>14.2} {:>14.2} {:>12} {:>8}",
            label, c.monthly_installment, c.loan_term_months, c.total_amount, c.total_interest, benefit, payback,
        );
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        match err.downcast_ref::<EngineError>() {
            Some(engine_err) if engine_err.is_validation() => eprintln!("invalid input: {}", engine_err),
            _ => eprintln!("error: {:#}", err),
        }
        process::exit(1);
    }
}
