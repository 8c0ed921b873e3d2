//! Year-by-year expense projection
//!
//! Operating lines inflate from year 2 on. The mortgage payment and mortgage
//! insurance are level amounts and never inflate.

use serde::{Deserialize, Serialize};

use super::equity::EquitySnapshot;
use crate::config::InvestmentConfig;
use crate::loan::LoanTerms;

/// An expense line resolved to its year-1 monthly amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedExpense {
    pub name: String,
    pub monthly_amount: f64,
    pub deductible: bool,
}

/// Monthly expenses for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    /// Inflated operating lines
    pub operating: f64,
    /// Inflated operating lines that are tax deductible
    pub deductible_operating: f64,
    /// Scheduled principal and interest, 0 once the loan is paid off
    pub mortgage_payment: f64,
    /// Mortgage insurance, 0 once equity passes the threshold
    pub pmi: f64,
}

impl ExpenseBreakdown {
    /// Cash-basis monthly total
    pub fn total(&self) -> f64 {
        self.operating + self.mortgage_payment + self.pmi
    }

    /// Tax-basis monthly total; mortgage interest and depreciation are added separately
    pub fn deductible(&self) -> f64 {
        self.deductible_operating + self.pmi
    }
}

/// Inflates the configured expense profile over the horizon
#[derive(Debug, Clone)]
pub struct ExpenseProjector {
    lines: Vec<ResolvedExpense>,
    inflation_rate: f64,
    mortgage_payment: f64,
    pmi_monthly: f64,
}

impl ExpenseProjector {
    pub fn new(config: &InvestmentConfig, loan: &LoanTerms) -> Self {
        let basis = config.expense_basis();
        let lines = config
            .expenses
            .lines()
            .iter()
            .map(|line| ResolvedExpense {
                name: line.name.clone(),
                monthly_amount: line.monthly_amount(&basis),
                deductible: line.deductible,
            })
            .collect();

        let pmi_monthly = if loan.has_loan() {
            config.mortgage_insurance.monthly_amount(&basis)
        } else {
            0.0
        };

        Self {
            lines,
            inflation_rate: config.expense_inflation_rate,
            mortgage_payment: loan.monthly_payment(),
            pmi_monthly,
        }
    }

    /// Year-1 monthly amounts per line
    pub fn resolved_lines(&self) -> &[ResolvedExpense] {
        &self.lines
    }

    /// Monthly mortgage insurance while it applies
    pub fn pmi_monthly(&self) -> f64 {
        self.pmi_monthly
    }

    pub fn mortgage_payment(&self) -> f64 {
        self.mortgage_payment
    }

    /// Multiplier applied to operating lines in `year`
    pub fn inflation_factor(&self, year: u32) -> f64 {
        (1.0 + self.inflation_rate).powi(year.saturating_sub(1) as i32)
    }

    pub fn project(&self, equity: &EquitySnapshot) -> ExpenseBreakdown {
        let factor = self.inflation_factor(equity.year);

        let (operating, deductible_operating) =
            self.lines.iter().fold((0.0, 0.0), |(total, deductible), line| {
                let amount = line.monthly_amount * factor;
                if line.deductible {
                    (total + amount, deductible + amount)
                } else {
                    (total + amount, deductible)
                }
            });

        ExpenseBreakdown {
            operating,
            deductible_operating,
            mortgage_payment: if equity.loan_balance > 0.0 {
                self.mortgage_payment
            } else {
                0.0
            },
            pmi: if equity.pmi_required {
                self.pmi_monthly
            } else {
                0.0
            },
        }
    }
}
