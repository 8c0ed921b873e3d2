//! Closed-form amortization for a fixed-rate, fully amortizing loan
//!
//! Payments are level for the life of the loan and made monthly in arrears.
//! A zero rate is handled as linear amortization rather than through the
//! annuity formula, which would divide by zero.

use serde::{Deserialize, Serialize};

use crate::config::MAX_LOAN_TERM_YEARS;
use crate::error::{ensure_fraction, ensure_non_negative, ConfigError};

/// Rates below this are treated as zero
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// `(1 + rate)^months`, or `None` once it leaves the finite range
fn growth_factor(monthly_rate: f64, months: u32) -> Option<f64> {
    let months = i32::try_from(months).ok()?;
    let growth = (1.0 + monthly_rate).powi(months);
    growth.is_finite().then_some(growth)
}

/// Level monthly payment that retires `principal` over `term_months`
///
/// NaN when the compounding factor overflows; validated terms never do.
pub fn monthly_payment(principal: f64, monthly_rate: f64, term_months: u32) -> f64 {
    if principal <= 0.0 || term_months == 0 {
        return 0.0;
    }
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return principal / term_months as f64;
    }

    match growth_factor(monthly_rate, term_months) {
        Some(growth) => principal * monthly_rate * growth / (growth - 1.0),
        None => f64::NAN,
    }
}

/// Outstanding balance after `payments_made` scheduled payments
///
/// Returns `principal` at 0 payments and 0 once the term is reached. Like
/// [`monthly_payment`], an overflowing compounding factor yields NaN.
pub fn remaining_balance(
    principal: f64,
    monthly_rate: f64,
    term_months: u32,
    payments_made: u32,
) -> f64 {
    if principal <= 0.0 || term_months == 0 || payments_made >= term_months {
        return 0.0;
    }
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        let paid = principal / term_months as f64 * payments_made as f64;
        return (principal - paid).max(0.0);
    }

    match (
        growth_factor(monthly_rate, term_months),
        growth_factor(monthly_rate, payments_made),
    ) {
        (Some(growth_n), Some(growth_p)) => {
            (principal * (growth_n - growth_p) / (growth_n - 1.0)).max(0.0)
        }
        _ => f64::NAN,
    }
}

/// Interest accrued over loan year `year` (1-indexed)
///
/// Sums balance-at-start-of-month x rate over the twelve months of the year,
/// evaluating the closed-form balance at each month offset.
pub fn annual_interest(principal: f64, monthly_rate: f64, term_months: u32, year: u32) -> f64 {
    if year == 0 {
        return 0.0;
    }
    let first_payment = (year - 1) * 12;
    (0..12)
        .map(|month| {
            remaining_balance(principal, monthly_rate, term_months, first_payment + month)
                * monthly_rate
        })
        .sum()
}

/// Terms of the single fixed-rate mortgage on the property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate (0.06 = 6%)
    pub annual_rate: f64,

    /// Contractual term in months
    pub term_months: u32,
}

impl LoanTerms {
    /// Build validated loan terms
    pub fn new(principal: f64, annual_rate: f64, term_months: u32) -> Result<Self, ConfigError> {
        ensure_non_negative("loan principal", principal)?;
        ensure_fraction("mortgage_annual_rate", annual_rate)?;
        if term_months == 0 {
            return Err(ConfigError::TooSmall {
                field: "loan term months",
                value: 0.0,
                min: 1.0,
            });
        }
        let max_months = MAX_LOAN_TERM_YEARS * 12;
        if term_months > max_months {
            return Err(ConfigError::OutOfRange {
                field: "loan term months",
                value: f64::from(term_months),
                min: 1.0,
                max: f64::from(max_months),
            });
        }
        Ok(Self {
            principal,
            annual_rate,
            term_months,
        })
    }

    /// Loan terms for an all-cash purchase
    pub fn none() -> Self {
        Self {
            principal: 0.0,
            annual_rate: 0.0,
            term_months: 1,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    pub fn has_loan(&self) -> bool {
        self.principal > 0.0
    }

    pub fn monthly_payment(&self) -> f64 {
        monthly_payment(self.principal, self.monthly_rate(), self.term_months)
    }

    pub fn remaining_balance(&self, payments_made: u32) -> f64 {
        remaining_balance(
            self.principal,
            self.monthly_rate(),
            self.term_months,
            payments_made,
        )
    }

    /// Balance at the end of analysis year `year`
    pub fn balance_at_year_end(&self, year: u32) -> f64 {
        self.remaining_balance(year.saturating_mul(12))
    }

    pub fn annual_interest(&self, year: u32) -> f64 {
        annual_interest(self.principal, self.monthly_rate(), self.term_months, year)
    }

    /// Principal retired during year `year`
    pub fn annual_principal(&self, year: u32) -> f64 {
        if year == 0 {
            return 0.0;
        }
        self.balance_at_year_end(year - 1) - self.balance_at_year_end(year)
    }
}
