//! Mortgage amortization: level payment, outstanding balance and interest

mod amortization;
mod payoff;

pub use amortization::{annual_interest, monthly_payment, remaining_balance, LoanTerms};
pub use payoff::PayoffAnalysis;
