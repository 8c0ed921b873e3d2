//! Sensitivity sweep over one input
//!
//! Runs the base configuration once per value of the swept parameter, in parallel,
//! and prints the exit metrics side by side.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::warn;

use property_projection::config::loader::load_config;
use property_projection::scenario::evenly_spaced;
use property_projection::{InvestmentConfig, ScenarioRunner, SweepParameter};

#[derive(Parser, Debug)]
#[command(
    name = "sweep",
    version,
    about = "Sweep one input of a property projection over a range"
)]
struct Args {
    /// Investment configuration (JSON); built-in sample property when omitted
    config: Option<PathBuf>,

    /// Input to vary
    #[arg(long, value_enum)]
    parameter: SweepParameter,

    /// First value
    #[arg(long)]
    from: f64,

    /// Last value
    #[arg(long)]
    to: f64,

    /// Number of values, endpoints included
    #[arg(long, default_value_t = 5)]
    steps: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.steps > 0, "--steps must be at least 1");

    let base = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => InvestmentConfig::default(),
    };

    let values = evenly_spaced(args.from, args.to, args.steps);
    let runner = ScenarioRunner::new(base);

    println!(
        "Sweeping {} from {} to {} ({} runs)...",
        args.parameter, args.from, args.to, values.len()
    );
    let start = Instant::now();
    let results = runner.sweep(args.parameter, &values);
    println!("Projections complete in {:?}\n", start.elapsed());

    println!(
        "{:>14} {:>12} {:>10} {:>10} {:>12} {:>14}",
        "Value", "Mo CF Yr1", "ROI%", "Exit IRR%", "Break-even", "Total Profit"
    );
    println!("{}", "-".repeat(77));

    for (value, report) in &results {
        match report {
            Ok(report) => {
                let s = &report.summary;
                let first_cf = report.years.first().map_or(0.0, |y| y.monthly_cash_flow);
                let irr = s
                    .exit_irr
                    .map_or_else(|| "n/a".to_string(), |irr| format!("{:.2}", irr * 100.0));
                println!(
                    "{:>14.4} {:>12.2} {:>10.2} {:>10} {:>12} {:>14.0}",
                    value,
                    first_cf,
                    s.final_total_roi,
                    irr,
                    s.break_even.to_string(),
                    s.final_total_profit,
                );
            }
            Err(err) => {
                warn!("{} = {} rejected: {}", args.parameter, value, err);
                println!("{:>14.4} invalid: {}", value, err);
            }
        }
    }

    Ok(())
}
