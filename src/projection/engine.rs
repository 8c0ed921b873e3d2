//! Core projection engine for yearly rental property cash flow projections

use log::{debug, trace};

use super::cashflows::{ProjectionResult, YearProjection};
use super::equity::EquityTracker;
use super::expenses::ExpenseProjector;
use super::state::ProjectionState;
use crate::config::InvestmentConfig;
use crate::error::ConfigError;
use crate::loan::LoanTerms;

/// Main projection engine
///
/// Holds one validated configuration and the components derived from it. A
/// projection is a pure function of the configuration: running it twice gives
/// identical results.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: InvestmentConfig,
    loan: LoanTerms,
    equity: EquityTracker,
    expenses: ExpenseProjector,
}

impl ProjectionEngine {
    /// Validate the configuration and build the engine
    pub fn new(config: InvestmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let loan = config.loan_terms()?;
        let equity = EquityTracker::new(&config, loan);
        let expenses = ExpenseProjector::new(&config, &loan);

        Ok(Self {
            config,
            loan,
            equity,
            expenses,
        })
    }

    pub fn config(&self) -> &InvestmentConfig {
        &self.config
    }

    pub fn loan(&self) -> &LoanTerms {
        &self.loan
    }

    pub fn equity_tracker(&self) -> &EquityTracker {
        &self.equity
    }

    pub fn expense_projector(&self) -> &ExpenseProjector {
        &self.expenses
    }

    /// Monthly rent in `year`; growth applies from year 1
    pub fn monthly_rent(&self, year: u32) -> f64 {
        self.config.monthly_rent * (1.0 + self.config.rental_growth_rate).powi(year as i32)
    }

    /// Run the projection over the configured horizon
    pub fn project(&self) -> ProjectionResult {
        let outlay = self.config.initial_outlay();
        debug!(
            "Projecting {} years: price {:.0}, loan {:.0}, outlay {:.0}",
            self.config.analysis_years,
            self.config.purchase_price,
            self.loan.principal,
            outlay
        );

        let years = (1..=self.config.analysis_years)
            .scan(ProjectionState::opening(outlay), |state, year| {
                Some(self.project_year(state, year))
            })
            .collect();

        ProjectionResult {
            initial_outlay: outlay,
            years,
        }
    }

    /// Compute one year and close it on the running state
    fn project_year(&self, state: &mut ProjectionState, year: u32) -> YearProjection {
        let equity = self.equity.snapshot(year);
        let expenses = self.expenses.project(&equity);

        let monthly_rent = self.monthly_rent(year);
        let annual_rent = monthly_rent * 12.0;
        let monthly_expenses = expenses.total();
        let deductible_monthly = expenses.deductible();

        let annual_interest = self.loan.annual_interest(year);
        let annual_depreciation = self.config.annual_depreciation();

        let taxable_income =
            annual_rent - (deductible_monthly * 12.0 + annual_interest + annual_depreciation);
        // Losses shelter other income; profits are not taxed here
        let tax_savings = if taxable_income < 0.0 {
            -taxable_income * self.config.total_tax_rate()
        } else {
            0.0
        };

        let monthly_cash_flow = monthly_rent - monthly_expenses;
        let annual_cash_flow = monthly_cash_flow * 12.0 + tax_savings;
        let net_profit_loss =
            annual_rent - deductible_monthly * 12.0 - annual_depreciation - annual_interest;
        let net_operating_income = annual_rent - monthly_expenses * 12.0;

        let cumulative_cash_flow = state.close_year(annual_cash_flow);
        let outlay = state.initial_outlay;

        let sale_price = equity.property_value;
        let sale_costs = sale_price * self.config.sale_closing_cost_rate;
        let net_sale_proceeds = sale_price - sale_costs - equity.loan_balance;
        let total_profit = net_sale_proceeds + cumulative_cash_flow - outlay;

        trace!(
            "Year {}: rent {:.2}, expenses {:.2}, cash flow {:.2}, cumulative {:.2}",
            year,
            monthly_rent,
            monthly_expenses,
            annual_cash_flow,
            cumulative_cash_flow
        );

        YearProjection {
            year,
            property_value: equity.property_value,
            loan_balance: equity.loan_balance,
            equity: equity.equity,
            equity_pct: equity.equity_pct,
            pmi_required: equity.pmi_required,
            monthly_rent,
            annual_rent,
            monthly_pmi: expenses.pmi,
            monthly_mortgage_payment: expenses.mortgage_payment,
            monthly_expenses,
            annual_expenses: monthly_expenses * 12.0,
            deductible_monthly_expenses: deductible_monthly,
            annual_mortgage_interest: annual_interest,
            annual_depreciation,
            taxable_income,
            tax_savings,
            net_operating_income,
            monthly_cash_flow,
            annual_cash_flow,
            net_profit_loss,
            cumulative_cash_flow,
            cash_on_cash_return: percent_of(annual_cash_flow, outlay),
            sale_price,
            sale_costs,
            net_sale_proceeds,
            total_profit,
            total_roi: percent_of(total_profit, outlay),
        }
    }
}

/// `value / base × 100`, 0 when the base is not positive
fn percent_of(value: f64, base: f64) -> f64 {
    if base > 0.0 {
        value / base * 100.0
    } else {
        0.0
    }
}
