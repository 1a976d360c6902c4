//! CSV export of amortization and refinance schedules

use serde::Serialize;
use std::error::Error;
use std::io::Write;
use std::path::Path;

use crate::amortization::{CalculationResult, ScenarioResult};
use crate::refinance::{RefinanceResult, RefinanceVariant};

#[derive(Debug, Serialize)]
struct AmortizationRow<'a> {
    scenario: &'a str,
    installment_number: u32,
    date: String,
    total_amount: String,
    principal_amount: String,
    interest_amount: String,
    overpayment_amount: String,
    remaining_debt: String,
}

#[derive(Debug, Serialize)]
struct RefinanceRow<'a> {
    variant: &'a str,
    installment_number: u32,
    date: String,
    amount: String,
    principal: String,
    interest: String,
    remaining_balance: String,
    days_in_period: Option<i64>,
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn write_scenario<W: Write>(writer: &mut csv::Writer<W>, label: &str, scenario: &ScenarioResult) -> csv::Result<()> {
    for row in &scenario.installments {
        writer.serialize(AmortizationRow {
            scenario: label,
            installment_number: row.installment_number,
            date: row.date.to_string(),
            total_amount: money(row.total_amount),
            principal_amount: money(row.principal_amount),
            interest_amount: money(row.interest_amount),
            overpayment_amount: money(row.overpayment_amount),
            remaining_debt: money(row.remaining_debt),
        })?;
    }
    Ok(())
}

fn write_variant<W: Write>(writer: &mut csv::Writer<W>, label: &str, variant: &RefinanceVariant) -> csv::Result<()> {
    for row in &variant.schedule {
        writer.serialize(RefinanceRow {
            variant: label,
            installment_number: row.installment_number,
            date: row.date.to_string(),
            amount: money(row.amount),
            principal: money(row.principal),
            interest: money(row.interest),
            remaining_balance: money(row.remaining_balance),
            days_in_period: row.days_in_period,
        })?;
    }
    Ok(())
}

/// Both scenarios, one row per installment, amounts rounded to cents
pub fn write_amortization<W: Write>(out: W, result: &CalculationResult) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(out);
    write_scenario(&mut writer, "base", &result.base_scenario)?;
    write_scenario(&mut writer, "overpayment", &result.overpayment_scenario)?;
    writer.flush()?;
    Ok(())
}

pub fn write_amortization_csv<P: AsRef<Path>>(path: P, result: &CalculationResult) -> Result<(), Box<dyn Error>> {
    write_amortization(std::fs::File::create(path)?, result)
}

/// All three variant schedules
pub fn write_refinance<W: Write>(out: W, result: &RefinanceResult) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(out);
    write_variant(&mut writer, "A", &result.variant_a)?;
    write_variant(&mut writer, "B", &result.variant_b)?;
    write_variant(&mut writer, "C", &result.variant_c)?;
    writer.flush()?;
    Ok(())
}

pub fn write_refinance_csv<P: AsRef<Path>>(path: P, result: &RefinanceResult) -> Result<(), Box<dyn Error>> {
    write_refinance(std::fs::File::create(path)?, result)
}
