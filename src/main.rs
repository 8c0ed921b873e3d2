//! Property Projection CLI
//!
//! Command-line interface for projecting a single rental property purchase

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use log::info;

use property_projection::config::loader::{load_config, load_expense_profile};
use property_projection::output::{write_comparison_csv, write_projection_csv};
use property_projection::{InvestmentConfig, ProjectionEngine, ProjectionReport};

#[derive(Parser, Debug)]
#[command(
    name = "property-projection",
    version,
    about = "Project the multi-year outcome of a leveraged rental property purchase"
)]
struct Args {
    /// Investment configuration (JSON); built-in sample property when omitted
    config: Option<PathBuf>,

    /// Expense profile (CSV: name,rate,amount,base,deductible) replacing the configured lines
    #[arg(long)]
    expenses: Option<PathBuf>,

    /// Override the analysis horizon in years
    #[arg(long)]
    years: Option<u32>,

    /// Write the year-by-year series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the alternative investment comparison to this CSV file
    #[arg(long)]
    comparison_csv: Option<PathBuf>,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Calendar year of purchase, used to label years (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            info!("No configuration given, using the built-in sample property");
            InvestmentConfig::default()
        }
    };
    if let Some(path) = &args.expenses {
        config.expenses = load_expense_profile(path)
            .with_context(|| format!("Failed to load expense profile from {}", path.display()))?;
    }
    if let Some(years) = args.years {
        config = config.with_analysis_years(years);
    }

    let engine = ProjectionEngine::new(config).context("Invalid investment configuration")?;
    let report = engine.report();

    if let Some(path) = &args.csv {
        write_projection_csv(path, &report.years)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.comparison_csv {
        match &report.comparison {
            Some(rows) => write_comparison_csv(path, rows)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => anyhow::bail!(
                "--comparison-csv requires a \"comparison\" section in the configuration"
            ),
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    let start_year = args.start_year.unwrap_or_else(|| chrono::Local::now().year());
    print_inputs(&engine);
    print_years(&report, start_year);
    print_comparison(&report, start_year);
    print_summary(&report, start_year);

    Ok(())
}

fn print_inputs(engine: &ProjectionEngine) {
    let config = engine.config();
    let loan = engine.loan();

    println!("Property Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");
    println!("Purchase:");
    println!("  Price:             ${:.2}", config.purchase_price);
    println!("  Down payment:      ${:.2}", config.down_payment);
    println!("  Closing costs:     ${:.2}", config.closing_costs);
    println!("  Loan amount:       ${:.2}", loan.principal);
    println!(
        "  Mortgage payment:  ${:.2}/month ({:.3}% over {} years)",
        loan.monthly_payment(),
        loan.annual_rate * 100.0,
        config.loan_term_years
    );
    println!("  Mortgage insurance: ${:.2}/month", engine.expense_projector().pmi_monthly());
    println!("\nYear-1 expenses:");
    for line in engine.expense_projector().resolved_lines() {
        println!(
            "  {:<24} ${:>9.2}{}",
            line.name,
            line.monthly_amount,
            if line.deductible { "" } else { "  (not deductible)" }
        );
    }
    println!();
}

fn print_years(report: &ProjectionReport, start_year: i32) {
    println!("Projection Results ({} years):", report.years.len());
    println!(
        "{:>4} {:>5} {:>12} {:>12} {:>7} {:>7} {:>9} {:>9} {:>10} {:>10} {:>12} {:>8}",
        "Year",
        "Cal",
        "Value",
        "Balance",
        "Eq%",
        "PMI",
        "Rent",
        "Expenses",
        "Mo CF",
        "Tax Sav",
        "Cumulative",
        "ROI%"
    );
    println!("{}", "-".repeat(118));

    for y in &report.years {
        println!(
            "{:>4} {:>5} {:>12.0} {:>12.0} {:>7.2} {:>7.2} {:>9.2} {:>9.2} \
             {:>10.2} {:>10.2} {:>12.2} {:>8.2}",
            y.year,
            start_year + y.year as i32,
            y.property_value,
            y.loan_balance,
            y.equity_pct,
            y.monthly_pmi,
            y.monthly_rent,
            y.monthly_expenses,
            y.monthly_cash_flow,
            y.tax_savings,
            y.cumulative_cash_flow,
            y.total_roi,
        );
    }
}

fn print_comparison(report: &ProjectionReport, start_year: i32) {
    let Some(rows) = &report.comparison else {
        return;
    };

    println!("\nAlternative Investment Comparison:");
    println!(
        "{:>4} {:>5} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Cal", "Alt Value", "Alt Gain", "Equity", "RE Gain", "Alt Advantage"
    );
    println!("{}", "-".repeat(86));
    for row in rows {
        println!(
            "{:>4} {:>5} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
            row.year,
            start_year + row.year as i32,
            row.alternative_value,
            row.alternative_gain,
            row.equity,
            row.real_estate_gain,
            row.alternative_advantage,
        );
    }
}

fn print_summary(report: &ProjectionReport, start_year: i32) {
    let s = &report.summary;
    let calendar = |year: Option<u32>| {
        year.map(|y| format!(" ({})", start_year + y as i32))
            .unwrap_or_default()
    };

    println!("\nSummary:");
    println!("  Initial investment:     ${:.2}", s.initial_investment);
    println!("  Total cash flow:        ${:.2}", s.total_cash_flow);
    println!("  Total net profit/loss:  ${:.2}", s.total_net_profit_loss);
    println!(
        "  Total tax savings:      ${:.2} (avg ${:.2}/yr, {:.1}% of investment)",
        s.total_tax_savings, s.average_annual_tax_savings, s.tax_savings_pct_of_investment
    );
    println!("  Total PMI paid:         ${:.2}", s.total_pmi_paid);
    println!(
        "  Monthly cash flow:      mean ${:.2}, std ${:.2}, worst ${:.2}",
        s.mean_monthly_cash_flow, s.std_monthly_cash_flow, s.max_monthly_loss
    );
    println!(
        "  Break-even:             {}{}",
        s.break_even,
        calendar(s.break_even.year())
    );
    println!(
        "  PMI removal:            {}{}",
        s.pmi_removal,
        calendar(s.pmi_removal.year())
    );
    match s.months_to_pmi_threshold {
        Some(months) => println!("  Months to PMI threshold: {}", months),
        None => println!("  Months to PMI threshold: not within the loan term"),
    }
    println!("  Final property value:   ${:.2}", s.final_property_value);
    println!("  Final equity:           ${:.2}", s.final_equity);
    println!("  Total profit if sold:   ${:.2}", s.final_total_profit);
    println!("  Total ROI:              {:.2}%", s.final_total_roi);
    match s.exit_irr {
        Some(irr) => println!("  Exit IRR:               {:.2}%", irr * 100.0),
        None => println!("  Exit IRR:               n/a"),
    }

    if s.payoff.total_monthly_payment > 0.0 {
        println!("\nLoan payoff:");
        println!("  Monthly payment:        ${:.2}", s.payoff.total_monthly_payment);
        match (s.payoff.payoff_months, s.payoff.years_saved) {
            (Some(months), Some(saved)) => {
                println!("  Paid off in:            {:.1} years", months / 12.0);
                println!("  Years saved:            {:.1}", saved);
            }
            _ => println!("  Payment never covers the monthly interest"),
        }
    }

    println!("\nAssessment:");
    println!(
        "  {} (first-year cash-on-cash {:.2}%)",
        s.income_rating, s.first_year_cash_on_cash
    );
    println!("  {}", s.break_even_rating);
}
