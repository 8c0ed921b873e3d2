//! Property value, loan balance, equity and mortgage insurance eligibility by year

use serde::{Deserialize, Serialize};

use crate::config::InvestmentConfig;
use crate::loan::LoanTerms;

/// Equity position at the end of one analysis year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    /// Equity as a percentage of property value (0-100)
    pub equity_pct: f64,
    /// Mortgage insurance is charged this year
    pub pmi_required: bool,
}

/// Equity as a percentage of value, 0 when the value is not positive
pub fn equity_pct(property_value: f64, loan_balance: f64) -> f64 {
    if property_value <= 0.0 {
        0.0
    } else {
        (property_value - loan_balance) / property_value * 100.0
    }
}

/// Tracks appreciation against amortization
#[derive(Debug, Clone)]
pub struct EquityTracker {
    purchase_price: f64,
    appreciation_rate: f64,
    threshold_pct: f64,
    loan: LoanTerms,
}

impl EquityTracker {
    pub fn new(config: &InvestmentConfig, loan: LoanTerms) -> Self {
        Self {
            purchase_price: config.purchase_price,
            appreciation_rate: config.property_appreciation_rate,
            threshold_pct: config.pmi_equity_threshold_pct,
            loan,
        }
    }

    /// Value at the end of `year`, compounded once per year
    pub fn property_value(&self, year: u32) -> f64 {
        self.purchase_price * (1.0 + self.appreciation_rate).powi(year as i32)
    }

    /// Mortgage insurance applies while equity is under the threshold and a balance remains
    ///
    /// Evaluated from scratch each year so a value decline can bring it back.
    pub fn pmi_required(&self, equity_pct: f64, loan_balance: f64) -> bool {
        equity_pct < self.threshold_pct && loan_balance > 0.0
    }

    pub fn snapshot(&self, year: u32) -> EquitySnapshot {
        let property_value = self.property_value(year);
        let loan_balance = self.loan.balance_at_year_end(year);
        let equity_pct = equity_pct(property_value, loan_balance);

        EquitySnapshot {
            year,
            property_value,
            loan_balance,
            equity: property_value - loan_balance,
            equity_pct,
            pmi_required: self.pmi_required(equity_pct, loan_balance),
        }
    }

    /// First month in which equity reaches the threshold paying only the schedule
    ///
    /// Steps month by month: value appreciates at `rate / 12`, the balance drops by
    /// the scheduled payment less interest. None if the threshold is not reached
    /// within the loan term.
    pub fn months_to_threshold(&self) -> Option<u32> {
        let monthly_appreciation = self.appreciation_rate / 12.0;
        let monthly_rate = self.loan.monthly_rate();
        let payment = self.loan.monthly_payment();

        let mut value = self.purchase_price;
        let mut balance = self.loan.principal;

        for month in 1..=self.loan.term_months {
            value *= 1.0 + monthly_appreciation;
            if balance > 0.0 {
                let interest = balance * monthly_rate;
                balance = (balance - (payment - interest)).max(0.0);
            }
            if equity_pct(value, balance) >= self.threshold_pct {
                return Some(month);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::remaining_balance;

    fn tracker(down_payment: f64) -> EquityTracker {
        let config = InvestmentConfig {
            purchase_price: 360_000.0,
            down_payment,
            mortgage_annual_rate: 0.06,
            loan_term_years: 30,
            property_appreciation_rate: 0.03,
            ..Default::default()
        };
        let loan = config.loan_terms().unwrap();
        EquityTracker::new(&config, loan)
    }

    /// Reference equity % built by stepping the loan month by month
    fn reference_equity_table(down_payment: f64, years: u32) -> Vec<f64> {
        let principal = 360_000.0 - down_payment;
        let rate: f64 = 0.005;
        let growth = (1.0 + rate).powi(360);
        let payment = principal * rate * growth / (growth - 1.0);

        let mut balance = principal;
        let mut value = 360_000.0;
        let mut table = Vec::new();
        for _year in 1..=years {
            for _month in 0..12 {
                balance = balance * (1.0 + rate) - payment;
            }
            value *= 1.03;
            table.push((value - balance) / value * 100.0);
        }
        table
    }

    #[test]
    fn test_equity_crossing_matches_reference_table() {
        let tracker = tracker(15_000.0);
        let reference = reference_equity_table(15_000.0, 5);

        let expected_year = reference.iter().position(|pct| *pct >= 20.0).map(|i| i as u32 + 1);
        let crossing_year = (1..=5)
            .map(|year| tracker.snapshot(year))
            .find(|s| s.equity_pct >= 20.0)
            .map(|s| s.year);

        assert_eq!(expected_year, Some(5));
        assert_eq!(crossing_year, expected_year);

        for (i, pct) in reference.iter().enumerate() {
            let snap = tracker.snapshot(i as u32 + 1);
            assert!(
                (snap.equity_pct - pct).abs() < 1e-6,
                "Year {} equity mismatch: {} vs {}",
                i + 1,
                snap.equity_pct,
                pct
            );
        }
    }

    #[test]
    fn test_pmi_drops_and_stays_off_under_appreciation() {
        let tracker = tracker(15_000.0);
        let snapshots: Vec<_> = (1..=30).map(|y| tracker.snapshot(y)).collect();

        let first_off = snapshots.iter().position(|s| !s.pmi_required).unwrap();
        assert_eq!(snapshots[first_off].year, 5);
        assert!(snapshots[..first_off].iter().all(|s| s.pmi_required));
        assert!(snapshots[first_off..].iter().all(|s| !s.pmi_required));
    }

    #[test]
    fn test_pmi_returns_if_value_falls() {
        let config = InvestmentConfig {
            purchase_price: 360_000.0,
            down_payment: 90_000.0,
            mortgage_annual_rate: 0.06,
            loan_term_years: 30,
            ..Default::default()
        };
        let loan = config.loan_terms().unwrap();
        let tracker = EquityTracker::new(&config, loan);

        let balance = loan.balance_at_year_end(3);
        assert!(!tracker.pmi_required(equity_pct(360_000.0, balance), balance));
        // A 30% price drop pushes equity back under the threshold
        assert!(tracker.pmi_required(equity_pct(252_000.0, balance), balance));
    }

    #[test]
    fn test_paid_off_loan_has_no_pmi() {
        let tracker = tracker(15_000.0);
        let snap = tracker.snapshot(30);
        assert_eq!(snap.loan_balance, 0.0);
        assert!(!snap.pmi_required);
        assert!((snap.equity - snap.property_value).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_balance_uses_closed_form() {
        let tracker = tracker(60_000.0);
        let snap = tracker.snapshot(1);
        let expected = remaining_balance(300_000.0, 0.005, 360, 12);
        assert!((snap.loan_balance - expected).abs() < 1e-9);
        assert!((snap.property_value - 370_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_value_equity_pct() {
        assert_eq!(equity_pct(0.0, 100_000.0), 0.0);
    }

    #[test]
    fn test_months_to_threshold() {
        let months = tracker(15_000.0).months_to_threshold().unwrap();
        // Annual compounding crosses in year 5; monthly stepping lands in year 4 or 5
        assert!(months > 36 && months <= 60, "unexpected month {}", months);

        // 20% down is already at the threshold after the first month
        assert_eq!(tracker(72_000.0).months_to_threshold(), Some(1));
    }
}
