//! Loan and overpayment data structures, validation and input loading

mod data;
pub mod loader;

pub use data::{
    CalculationParams, CyclicOverpayment, Frequency, InstallmentType, InterestRateChange, LoanTerm,
    MortgageInput, Overpayment, OverpaymentEffect, MAX_TERM_YEARS,
};
pub use loader::{
    load_overpayments, load_overpayments_from_reader, load_params, load_params_batch, load_refinance_input,
};
