//! Load calculation inputs from JSON and one-time overpayments from CSV

use super::{CalculationParams, Overpayment};
use crate::refinance::RefinanceInput;
use chrono::NaiveDate;
use csv::Reader;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row: `date,amount`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: String,
    amount: f64,
}

impl CsvRow {
    fn to_overpayment(self) -> Result<Overpayment, Box<dyn Error>> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("Invalid overpayment date '{}': {}", self.date, e))?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("Overpayment on {} must be positive, got {}", date, self.amount).into());
        }
        Ok(Overpayment::new(date, self.amount))
    }
}

/// Load one-time overpayments from a CSV file
pub fn load_overpayments<P: AsRef<Path>>(path: P) -> Result<Vec<Overpayment>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_overpayments(reader)
}

/// Load one-time overpayments from any reader (e.g., string buffer)
pub fn load_overpayments_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Overpayment>, Box<dyn Error>> {
    collect_overpayments(Reader::from_reader(reader))
}

fn collect_overpayments<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Overpayment>, Box<dyn Error>> {
    let mut overpayments = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        overpayments.push(row.to_overpayment()?);
    }
    Ok(overpayments)
}

/// Load a single amortization request from a JSON file
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<CalculationParams, Box<dyn Error>> {
    let file = File::open(path)?;
    let params: CalculationParams = serde_json::from_reader(BufReader::new(file))?;
    Ok(params)
}

/// Load a JSON array of amortization requests
pub fn load_params_batch<P: AsRef<Path>>(path: P) -> Result<Vec<CalculationParams>, Box<dyn Error>> {
    let file = File::open(path)?;
    let batch: Vec<CalculationParams> = serde_json::from_reader(BufReader::new(file))?;
    Ok(batch)
}

/// Load a refinance request from a JSON file
pub fn load_refinance_input<P: AsRef<Path>>(path: P) -> Result<RefinanceInput, Box<dyn Error>> {
    let file = File::open(path)?;
    let input: RefinanceInput = serde_json::from_reader(BufReader::new(file))?;
    Ok(input)
}
