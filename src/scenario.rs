//! Scenario runner for batch projections and sensitivity sweeps
//!
//! Holds one base configuration and runs variants of it in parallel. Each run
//! builds its own engine; nothing but the immutable base is shared.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::InvestmentConfig;
use crate::error::ConfigError;
use crate::projection::ProjectionEngine;
use crate::report::ProjectionReport;

/// Input that a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SweepParameter {
    /// Nominal annual mortgage rate
    MortgageRate,
    /// Annual property appreciation
    Appreciation,
    /// Annual rent growth
    RentGrowth,
    /// Starting monthly rent
    MonthlyRent,
    /// Cash down payment
    DownPayment,
}

impl SweepParameter {
    /// Copy of `base` with this parameter set to `value`
    pub fn apply(&self, base: &InvestmentConfig, value: f64) -> InvestmentConfig {
        let mut config = base.clone();
        match self {
            SweepParameter::MortgageRate => config.mortgage_annual_rate = value,
            SweepParameter::Appreciation => config.property_appreciation_rate = value,
            SweepParameter::RentGrowth => config.rental_growth_rate = value,
            SweepParameter::MonthlyRent => config.monthly_rent = value,
            SweepParameter::DownPayment => config.down_payment = value,
        }
        config
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepParameter::MortgageRate => "mortgage rate",
            SweepParameter::Appreciation => "appreciation",
            SweepParameter::RentGrowth => "rent growth",
            SweepParameter::MonthlyRent => "monthly rent",
            SweepParameter::DownPayment => "down payment",
        };
        f.write_str(name)
    }
}

/// `steps` evenly spaced values from `from` to `to` inclusive
pub fn evenly_spaced(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (steps - 1) as f64;
            (0..steps).map(|i| from + step * i as f64).collect()
        }
    }
}

/// Runs many projections against one base configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(load_config("data/sample_property.json")?);
/// for (rate, report) in runner.sweep(SweepParameter::MortgageRate, &[0.05, 0.06, 0.07]) {
///     println!("{}: {:?}", rate, report?.summary.exit_irr);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: InvestmentConfig,
}

impl ScenarioRunner {
    pub fn new(base: InvestmentConfig) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &InvestmentConfig {
        &self.base
    }

    /// Run a single projection with the given config
    pub fn run(&self, config: InvestmentConfig) -> Result<ProjectionReport, ConfigError> {
        Ok(ProjectionEngine::new(config)?.report())
    }

    /// Run several configurations in parallel, results in input order
    pub fn run_scenarios(
        &self,
        configs: &[InvestmentConfig],
    ) -> Vec<Result<ProjectionReport, ConfigError>> {
        configs
            .par_iter()
            .map(|config| self.run(config.clone()))
            .collect()
    }

    /// Run the base with `parameter` set to each value, results in input order
    ///
    /// Invalid variants (e.g. a down payment above the price) come back as errors
    /// without stopping the others.
    pub fn sweep(
        &self,
        parameter: SweepParameter,
        values: &[f64],
    ) -> Vec<(f64, Result<ProjectionReport, ConfigError>)> {
        values
            .par_iter()
            .map(|&value| (value, self.run(parameter.apply(&self.base, value))))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(InvestmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced() {
        assert_eq!(evenly_spaced(0.0, 1.0, 0), Vec::<f64>::new());
        assert_eq!(evenly_spaced(0.05, 0.09, 1), vec![0.05]);
        let values = evenly_spaced(0.0, 1.0, 5);
        assert_eq!(values.len(), 5);
        assert!((values[1] - 0.25).abs() < 1e-12);
        assert!((values[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_preserves_order() {
        let runner = ScenarioRunner::default();
        let values = [0.04, 0.05, 0.06, 0.07, 0.08];
        let results = runner.sweep(SweepParameter::MortgageRate, &values);

        assert_eq!(results.len(), values.len());
        for ((value, report), expected) in results.iter().zip(values) {
            assert_eq!(*value, expected);
            assert!(report.is_ok());
        }

        // Higher rate means lower final ROI
        let rois: Vec<f64> = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().summary.final_total_roi)
            .collect();
        assert!(rois.windows(2).all(|w| w[1] < w[0]), "ROI not decreasing: {:?}", rois);
    }

    #[test]
    fn test_sweep_reports_invalid_variants() {
        let runner = ScenarioRunner::default();
        let results = runner.sweep(SweepParameter::DownPayment, &[50_000.0, 400_000.0]);

        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(ConfigError::DownPaymentExceedsPrice { .. })
        ));
    }

    #[test]
    fn test_run_scenarios_batch() {
        let runner = ScenarioRunner::default();
        let configs: Vec<_> = [2_200.0, 2_500.0, 2_800.0]
            .iter()
            .map(|&rent| SweepParameter::MonthlyRent.apply(runner.base(), rent))
            .collect();

        let results = runner.run_scenarios(&configs);
        assert_eq!(results.len(), 3);

        let cash_flow = |i: usize| results[i].as_ref().unwrap().summary.total_cash_flow;
        // Higher rent should result in higher total cash flow
        assert!(cash_flow(2) > cash_flow(1) && cash_flow(1) > cash_flow(0));
    }

    #[test]
    fn test_apply_sets_only_the_parameter() {
        let base = InvestmentConfig::default();
        let config = SweepParameter::Appreciation.apply(&base, 0.05);
        assert_eq!(config.property_appreciation_rate, 0.05);
        assert_eq!(config.mortgage_annual_rate, base.mortgage_annual_rate);
        assert_eq!(config.monthly_rent, base.monthly_rent);
    }
}
