//! Investment configuration: purchase, financing, income, expenses, taxes and growth
//!
//! One immutable `InvestmentConfig` is passed to every component. Thresholds the
//! projection depends on (depreciation period, sale costs, PMI equity cutoff) live
//! here with documented defaults rather than inline in the math.

mod expenses;
pub mod loader;

pub use expenses::{
    ExpenseAmount, ExpenseBase, ExpenseBasis, ExpenseLine, ExpenseProfile, RawExpenseAmount,
    RawExpenseLine,
};

use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_expense_rate, ensure_finite, ensure_fraction, ensure_in_range, ensure_non_negative,
    ConfigError,
};
use crate::loan::LoanTerms;

/// Residential rental property recovery period in years
pub const DEFAULT_DEPRECIATION_PERIOD_YEARS: f64 = 27.5;

/// Typical realtor and closing fees when selling
pub const DEFAULT_SALE_CLOSING_COST_RATE: f64 = 0.06;

/// Equity percentage at which mortgage insurance is dropped
pub const DEFAULT_PMI_EQUITY_THRESHOLD_PCT: f64 = 20.0;

/// Longest mortgage term accepted
pub const MAX_LOAN_TERM_YEARS: u32 = 40;

/// Longest projection horizon accepted
pub const MAX_ANALYSIS_YEARS: u32 = 100;

fn default_sale_closing_cost_rate() -> f64 {
    DEFAULT_SALE_CLOSING_COST_RATE
}

fn default_depreciation_period_years() -> f64 {
    DEFAULT_DEPRECIATION_PERIOD_YEARS
}

fn default_pmi_equity_threshold_pct() -> f64 {
    DEFAULT_PMI_EQUITY_THRESHOLD_PCT
}

/// Full input for one projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentConfig {
    /// Purchase price of the property
    pub purchase_price: f64,

    /// Cash down payment (loan amount = price - down payment)
    pub down_payment: f64,

    /// Buyer closing costs paid in cash at purchase
    #[serde(default)]
    pub closing_costs: f64,

    /// Nominal annual mortgage rate (0.069 = 6.9%)
    pub mortgage_annual_rate: f64,

    /// Loan term in years
    pub loan_term_years: u32,

    /// Extra principal paid every month, used for the payoff analysis only
    #[serde(default)]
    pub extra_monthly_payment: f64,

    /// Market rent per month at purchase
    pub monthly_rent: f64,

    /// Annual rent growth, applied at the start of every year including year 1
    #[serde(default)]
    pub rental_growth_rate: f64,

    /// Operating expense lines
    #[serde(default)]
    pub expenses: ExpenseProfile,

    /// Monthly mortgage insurance while equity is below the threshold
    #[serde(default)]
    pub mortgage_insurance: ExpenseAmount,

    #[serde(default)]
    pub federal_tax_rate: f64,

    #[serde(default)]
    pub state_tax_rate: f64,

    /// Annual property appreciation, compounded once per year
    #[serde(default)]
    pub property_appreciation_rate: f64,

    /// Annual inflation applied to operating expenses from year 2 on
    #[serde(default)]
    pub expense_inflation_rate: f64,

    /// Projection horizon in years
    pub analysis_years: u32,

    /// Selling costs as a fraction of the sale price
    #[serde(default = "default_sale_closing_cost_rate")]
    pub sale_closing_cost_rate: f64,

    /// Straight-line depreciation period for the purchase price
    #[serde(default = "default_depreciation_period_years")]
    pub depreciation_period_years: f64,

    /// Mortgage insurance is charged while equity % is below this
    #[serde(default = "default_pmi_equity_threshold_pct")]
    pub pmi_equity_threshold_pct: f64,

    /// Cutoffs for the qualitative assessment
    #[serde(default)]
    pub assessment: AssessmentThresholds,

    /// Alternative investment to benchmark against
    #[serde(default)]
    pub comparison: Option<ComparisonConfig>,
}

/// Parameters for the compounding alternative investment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Starting balance; defaults to the real-estate initial outlay
    #[serde(default)]
    pub initial_investment: Option<f64>,

    /// Amount added at the start of every month
    #[serde(default)]
    pub monthly_contribution: f64,

    /// Expected annual return, converted to monthly as annual / 12
    pub annual_return: f64,
}

/// Cutoffs for rating the first-year return and break-even speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentThresholds {
    /// First-year cash-on-cash % above which the income is rated strong
    pub strong_cash_on_cash_pct: f64,

    /// First-year cash-on-cash % above which the income is rated moderate
    pub moderate_cash_on_cash_pct: f64,

    /// Break-even at or before this year is rated quick
    pub quick_break_even_years: u32,

    /// Break-even at or before this year is rated moderate
    pub moderate_break_even_years: u32,
}

impl Default for AssessmentThresholds {
    fn default() -> Self {
        Self {
            strong_cash_on_cash_pct: 8.0,
            moderate_cash_on_cash_pct: 5.0,
            quick_break_even_years: 5,
            moderate_break_even_years: 10,
        }
    }
}

impl Default for InvestmentConfig {
    /// Single-family rental: $360k purchase with 15k down at 6.9% over 30 years
    fn default() -> Self {
        Self {
            purchase_price: 360_000.0,
            down_payment: 15_000.0,
            closing_costs: 8_236.0,
            mortgage_annual_rate: 0.069,
            loan_term_years: 30,
            extra_monthly_payment: 0.0,
            monthly_rent: 2_495.0,
            rental_growth_rate: 0.03,
            expenses: ExpenseProfile::new(vec![
                ExpenseLine::fixed("Fire insurance", 150.0),
                ExpenseLine::fixed("Property taxes", 329.0),
                ExpenseLine::fixed("Repairs & maintenance", 359.0),
                ExpenseLine::fixed("Sewer & water", 30.0),
                ExpenseLine::fixed("Trash", 30.0),
            ]),
            mortgage_insurance: ExpenseAmount::fixed(237.0),
            federal_tax_rate: 0.0,
            state_tax_rate: 0.0,
            property_appreciation_rate: 0.03,
            expense_inflation_rate: 0.03,
            analysis_years: 15,
            sale_closing_cost_rate: DEFAULT_SALE_CLOSING_COST_RATE,
            depreciation_period_years: DEFAULT_DEPRECIATION_PERIOD_YEARS,
            pmi_equity_threshold_pct: DEFAULT_PMI_EQUITY_THRESHOLD_PCT,
            assessment: AssessmentThresholds::default(),
            comparison: None,
        }
    }
}

impl InvestmentConfig {
    /// Check every field against its documented range
    ///
    /// Called before any projection runs; invalid input is never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("purchase_price", self.purchase_price)?;
        if self.purchase_price <= 0.0 {
            return Err(ConfigError::TooSmall {
                field: "purchase_price",
                value: self.purchase_price,
                min: f64::MIN_POSITIVE,
            });
        }
        ensure_non_negative("down_payment", self.down_payment)?;
        if self.down_payment > self.purchase_price {
            return Err(ConfigError::DownPaymentExceedsPrice {
                down_payment: self.down_payment,
                purchase_price: self.purchase_price,
            });
        }
        ensure_non_negative("closing_costs", self.closing_costs)?;
        ensure_non_negative("extra_monthly_payment", self.extra_monthly_payment)?;
        ensure_non_negative("monthly_rent", self.monthly_rent)?;

        ensure_fraction("mortgage_annual_rate", self.mortgage_annual_rate)?;
        ensure_fraction("rental_growth_rate", self.rental_growth_rate)?;
        ensure_fraction("federal_tax_rate", self.federal_tax_rate)?;
        ensure_fraction("state_tax_rate", self.state_tax_rate)?;
        ensure_fraction("property_appreciation_rate", self.property_appreciation_rate)?;
        ensure_fraction("expense_inflation_rate", self.expense_inflation_rate)?;
        ensure_fraction("sale_closing_cost_rate", self.sale_closing_cost_rate)?;

        let combined = self.total_tax_rate();
        if combined > 1.0 {
            return Err(ConfigError::CombinedTaxRate {
                federal: self.federal_tax_rate,
                state: self.state_tax_rate,
                combined,
            });
        }

        if self.loan_term_years == 0 {
            return Err(ConfigError::TooSmall {
                field: "loan_term_years",
                value: 0.0,
                min: 1.0,
            });
        }
        ensure_in_range(
            "loan_term_years",
            f64::from(self.loan_term_years),
            1.0,
            f64::from(MAX_LOAN_TERM_YEARS),
        )?;
        if self.analysis_years == 0 {
            return Err(ConfigError::TooSmall {
                field: "analysis_years",
                value: 0.0,
                min: 1.0,
            });
        }
        ensure_in_range(
            "analysis_years",
            f64::from(self.analysis_years),
            1.0,
            f64::from(MAX_ANALYSIS_YEARS),
        )?;

        ensure_finite("depreciation_period_years", self.depreciation_period_years)?;
        if self.depreciation_period_years <= 0.0 {
            return Err(ConfigError::TooSmall {
                field: "depreciation_period_years",
                value: self.depreciation_period_years,
                min: f64::MIN_POSITIVE,
            });
        }
        ensure_in_range(
            "pmi_equity_threshold_pct",
            self.pmi_equity_threshold_pct,
            0.0,
            100.0,
        )?;

        for line in self.expenses.lines() {
            validate_amount(&line.name, &line.amount)?;
        }
        validate_amount("mortgage_insurance", &self.mortgage_insurance)?;

        if let Some(comparison) = &self.comparison {
            if let Some(initial) = comparison.initial_investment {
                ensure_non_negative("comparison.initial_investment", initial)?;
            }
            ensure_non_negative(
                "comparison.monthly_contribution",
                comparison.monthly_contribution,
            )?;
            ensure_fraction("comparison.annual_return", comparison.annual_return)?;
        }

        Ok(())
    }

    pub fn loan_amount(&self) -> f64 {
        (self.purchase_price - self.down_payment).max(0.0)
    }

    /// Cash invested at purchase: down payment plus closing costs
    pub fn initial_outlay(&self) -> f64 {
        self.down_payment + self.closing_costs
    }

    pub fn total_tax_rate(&self) -> f64 {
        self.federal_tax_rate + self.state_tax_rate
    }

    pub fn loan_term_months(&self) -> u32 {
        self.loan_term_years.saturating_mul(12)
    }

    /// Validated loan terms derived from price, down payment and rate
    pub fn loan_terms(&self) -> Result<LoanTerms, ConfigError> {
        LoanTerms::new(
            self.loan_amount(),
            self.mortgage_annual_rate,
            self.loan_term_months(),
        )
    }

    /// Fixed annual depreciation charge
    pub fn annual_depreciation(&self) -> f64 {
        self.purchase_price / self.depreciation_period_years
    }

    /// Quantities rate-based expenses resolve against
    pub fn expense_basis(&self) -> ExpenseBasis {
        ExpenseBasis {
            property_value: self.purchase_price,
            monthly_rent: self.monthly_rent,
            loan_amount: self.loan_amount(),
        }
    }

    /// Copy with a different horizon
    pub fn with_analysis_years(mut self, years: u32) -> Self {
        self.analysis_years = years;
        self
    }
}

/// Re-check amounts built in code rather than through `TryFrom`
fn validate_amount(name: &str, amount: &ExpenseAmount) -> Result<(), ConfigError> {
    match *amount {
        ExpenseAmount::Rate { rate, .. } => {
            ensure_expense_rate(name, rate)?;
        }
        ExpenseAmount::FixedAmount { amount } => {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ConfigError::NegativeExpense {
                    name: name.to_string(),
                    kind: "amount",
                    value: amount,
                });
            }
        }
    }
    Ok(())
}
