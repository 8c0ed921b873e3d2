//! Property Projection - multi-year projection engine for leveraged rental property purchases
//!
//! This library provides:
//! - Closed-form amortization, remaining balance and accelerated payoff
//! - Year-by-year equity, mortgage insurance, expense and cash flow projection
//! - Tax shielding from interest, depreciation and deductible expenses
//! - Exit proceeds, ROI and exit IRR at every year end
//! - Benchmarking against a compounding alternative investment
//! - Parallel scenario batches and sensitivity sweeps

pub mod comparison;
pub mod config;
pub mod error;
pub mod loan;
pub mod output;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use comparison::{ComparisonRow, ComparisonSimulator};
pub use config::{ExpenseAmount, ExpenseBase, ExpenseLine, ExpenseProfile, InvestmentConfig};
pub use error::ConfigError;
pub use loan::{LoanTerms, PayoffAnalysis};
pub use projection::{ProjectionEngine, ProjectionResult, YearProjection};
pub use report::{Milestone, ProjectionReport, ProjectionSummary, ReportAggregator};
pub use scenario::{ScenarioRunner, SweepParameter};
