//! Year-by-year output structures for projections

use serde::{Deserialize, Serialize};

/// One closed year of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    // Timing
    pub year: u32,

    // Property and loan position at year end
    pub property_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    pub equity_pct: f64,
    pub pmi_required: bool,

    // Income
    pub monthly_rent: f64,
    pub annual_rent: f64,

    // Expenses (monthly unless noted)
    pub monthly_pmi: f64,
    pub monthly_mortgage_payment: f64,
    pub monthly_expenses: f64,
    pub annual_expenses: f64,
    pub deductible_monthly_expenses: f64,

    // Tax basis
    pub annual_mortgage_interest: f64,
    pub annual_depreciation: f64,
    pub taxable_income: f64,
    pub tax_savings: f64,

    // Results
    pub net_operating_income: f64,
    pub monthly_cash_flow: f64,
    /// Monthly cash flow × 12 plus tax savings
    pub annual_cash_flow: f64,
    /// Accrual basis: rent less deductible expenses, depreciation and interest
    pub net_profit_loss: f64,
    /// Initial outlay is included as a negative opening balance
    pub cumulative_cash_flow: f64,
    /// Percent of the initial outlay
    pub cash_on_cash_return: f64,

    // Sale at year end
    pub sale_price: f64,
    pub sale_costs: f64,
    pub net_sale_proceeds: f64,
    pub total_profit: f64,
    /// Percent of the initial outlay
    pub total_roi: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Down payment plus closing costs
    pub initial_outlay: f64,

    /// Yearly rows, year 1 first
    pub years: Vec<YearProjection>,
}

impl ProjectionResult {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Last projected year
    pub fn final_year(&self) -> Option<&YearProjection> {
        self.years.last()
    }

    /// Year-1 row
    pub fn first_year(&self) -> Option<&YearProjection> {
        self.years.first()
    }

    /// Annual cash flows in year order
    pub fn annual_cash_flows(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.annual_cash_flow).collect()
    }
}
