//! Accelerated payoff when an extra amount is paid on top of the scheduled payment

use serde::{Deserialize, Serialize};

use super::LoanTerms;

/// Effect of a recurring extra principal payment on the loan term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffAnalysis {
    /// Scheduled payment plus the extra amount
    pub total_monthly_payment: f64,

    /// Months until the balance reaches zero (fractional final month)
    /// None if the payment never covers the monthly interest
    pub payoff_months: Option<f64>,

    /// Years saved against the contractual term
    pub years_saved: Option<f64>,
}

impl LoanTerms {
    /// Months needed to retire the loan paying `extra` each month on top of the schedule
    ///
    /// N = -ln(1 - P*r/A) / ln(1 + r), with A the total monthly payment.
    pub fn payoff_months(&self, extra: f64) -> Option<f64> {
        if !self.has_loan() {
            return Some(0.0);
        }
        let extra = extra.max(0.0);
        if extra == 0.0 {
            return Some(self.term_months as f64);
        }

        let total = self.monthly_payment() + extra;
        let rate = self.monthly_rate();
        if rate.abs() < 1e-12 {
            return Some(self.principal / total);
        }

        let interest_only = self.principal * rate;
        if total <= interest_only {
            return None;
        }
        Some(-(1.0 - interest_only / total).ln() / (1.0 + rate).ln())
    }

    pub fn payoff_analysis(&self, extra: f64) -> PayoffAnalysis {
        let payoff_months = self.payoff_months(extra);
        let term_years = self.term_months as f64 / 12.0;
        PayoffAnalysis {
            total_monthly_payment: self.monthly_payment() + extra.max(0.0),
            payoff_months,
            years_saved: payoff_months.map(|months| term_years - months / 12.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_extra_keeps_term() {
        let terms = LoanTerms::new(300_000.0, 0.06, 360).unwrap();
        let analysis = terms.payoff_analysis(0.0);
        assert_eq!(analysis.payoff_months, Some(360.0));
        assert_eq!(analysis.years_saved, Some(0.0));
    }

    #[test]
    fn test_extra_payment_shortens_term() {
        let terms = LoanTerms::new(300_000.0, 0.06, 360).unwrap();
        let months = terms.payoff_months(500.0).unwrap();

        assert!(months < 360.0);
        // Paying exactly the payoff schedule must retire the loan: check against a
        // month-by-month simulation
        let payment = terms.monthly_payment() + 500.0;
        let mut balance = 300_000.0;
        let mut simulated = 0;
        while balance > 0.0 {
            balance = balance * 1.005 - payment;
            simulated += 1;
        }
        assert_eq!(simulated, months.ceil() as u32);
    }

    #[test]
    fn test_zero_rate_payoff() {
        let terms = LoanTerms::new(120_000.0, 0.0, 120).unwrap();
        let months = terms.payoff_months(1000.0).unwrap();
        assert!((months - 60.0).abs() < 1e-9);
        let analysis = terms.payoff_analysis(1000.0);
        assert!((analysis.years_saved.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_cash_purchase() {
        assert_eq!(LoanTerms::none().payoff_months(250.0), Some(0.0));
    }
}
