//! Alternative investment benchmark
//!
//! Compounds a starting balance plus a fixed monthly contribution and pairs the
//! result, year by year, with the equity built in the property. Runs from the
//! configuration alone and never reads projection state.

use serde::{Deserialize, Serialize};

use crate::config::InvestmentConfig;
use crate::projection::YearProjection;

/// Monthly compounding model for the alternative investment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonSimulator {
    /// Balance before the first month
    pub initial_balance: f64,

    /// Added at the start of every month
    pub monthly_contribution: f64,

    /// Annual return / 12
    pub monthly_return: f64,

    /// Length of the series
    pub months: u32,
}

/// Account position after one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Months elapsed (1-indexed)
    pub month: u32,
    pub balance: f64,
    /// Initial balance plus every contribution so far
    pub contributions: f64,
}

/// Lazy month-by-month balance series
///
/// Finite (stops after `months`) and restartable by cloning or calling
/// `ComparisonSimulator::iter` again.
#[derive(Debug, Clone)]
pub struct GrowthSeries {
    simulator: ComparisonSimulator,
    month: u32,
    balance: f64,
}

impl Iterator for GrowthSeries {
    type Item = GrowthPoint;

    fn next(&mut self) -> Option<GrowthPoint> {
        if self.month >= self.simulator.months {
            return None;
        }
        self.month += 1;
        self.balance = (self.balance + self.simulator.monthly_contribution)
            * (1.0 + self.simulator.monthly_return);

        Some(GrowthPoint {
            month: self.month,
            balance: self.balance,
            contributions: self.simulator.initial_balance
                + self.simulator.monthly_contribution * self.month as f64,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulator.months.saturating_sub(self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GrowthSeries {}

/// Alternative investment against property equity at one year end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub year: u32,

    // Alternative investment
    pub alternative_value: f64,
    pub alternative_contributions: f64,
    pub alternative_gain: f64,

    // Property
    pub property_value: f64,
    pub equity: f64,
    /// Initial outlay plus every annual cash shortfall so far
    pub real_estate_invested: f64,
    /// Equity less cash invested
    pub real_estate_gain: f64,

    /// Alternative value less property equity
    pub alternative_advantage: f64,
}

impl ComparisonSimulator {
    pub fn new(
        initial_balance: f64,
        monthly_contribution: f64,
        annual_return: f64,
        years: u32,
    ) -> Self {
        Self {
            initial_balance,
            monthly_contribution,
            monthly_return: annual_return / 12.0,
            months: years.saturating_mul(12),
        }
    }

    /// Simulator for the configured benchmark, None when no comparison is configured
    ///
    /// The starting balance defaults to the property's initial outlay.
    pub fn from_config(config: &InvestmentConfig) -> Option<Self> {
        config.comparison.as_ref().map(|comparison| {
            Self::new(
                comparison
                    .initial_investment
                    .unwrap_or_else(|| config.initial_outlay()),
                comparison.monthly_contribution,
                comparison.annual_return,
                config.analysis_years,
            )
        })
    }

    pub fn iter(&self) -> GrowthSeries {
        GrowthSeries {
            simulator: *self,
            month: 0,
            balance: self.initial_balance,
        }
    }

    /// Balance after `months` months, capped at the series length
    pub fn balance_after(&self, months: u32) -> f64 {
        self.iter()
            .take(months as usize)
            .last()
            .map_or(self.initial_balance, |point| point.balance)
    }

    /// One row per projected year, sampled at each year's final month
    pub fn rows(&self, years: &[YearProjection], initial_outlay: f64) -> Vec<ComparisonRow> {
        let year_ends = self.iter().skip(11).step_by(12);

        years
            .iter()
            .zip(year_ends)
            .scan(initial_outlay, |invested, (year, point)| {
                *invested += (-year.annual_cash_flow).max(0.0);
                let real_estate_invested = *invested;

                Some(ComparisonRow {
                    year: year.year,
                    alternative_value: point.balance,
                    alternative_contributions: point.contributions,
                    alternative_gain: point.balance - point.contributions,
                    property_value: year.property_value,
                    equity: year.equity,
                    real_estate_invested,
                    real_estate_gain: year.equity - real_estate_invested,
                    alternative_advantage: point.balance - year.equity,
                })
            })
            .collect()
    }
}
