//! Summary statistics, milestones and assessment over a finished projection

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::comparison::{ComparisonRow, ComparisonSimulator};
use crate::config::AssessmentThresholds;
use crate::loan::PayoffAnalysis;
use crate::projection::{exit_irr, ProjectionEngine, ProjectionResult, YearProjection};

/// Year in which a condition first held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Reached(u32),
    NotReached,
}

impl Milestone {
    /// First year in `years` satisfying `predicate`
    pub fn first<F>(years: &[YearProjection], predicate: F) -> Self
    where
        F: Fn(&YearProjection) -> bool,
    {
        years
            .iter()
            .find(|year| predicate(year))
            .map_or(Milestone::NotReached, |year| Milestone::Reached(year.year))
    }

    pub fn year(&self) -> Option<u32> {
        match self {
            Milestone::Reached(year) => Some(*year),
            Milestone::NotReached => None,
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::Reached(year) => write!(f, "Year {}", year),
            Milestone::NotReached => write!(f, "Not reached"),
        }
    }
}

/// Rating of the first-year cash-on-cash return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeRating {
    Strong,
    Moderate,
    Weak,
}

impl IncomeRating {
    pub fn from_cash_on_cash(pct: f64, thresholds: &AssessmentThresholds) -> Self {
        if pct > thresholds.strong_cash_on_cash_pct {
            IncomeRating::Strong
        } else if pct > thresholds.moderate_cash_on_cash_pct {
            IncomeRating::Moderate
        } else {
            IncomeRating::Weak
        }
    }
}

impl fmt::Display for IncomeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IncomeRating::Strong => "Strong income potential",
            IncomeRating::Moderate => "Moderate income potential",
            IncomeRating::Weak => "Income-focused metrics are weak",
        };
        f.write_str(text)
    }
}

/// Rating of how fast the initial outlay is recovered from cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenRating {
    Quick,
    Moderate,
    Long,
}

impl BreakEvenRating {
    /// Not reaching break-even within the horizon rates as long
    pub fn from_milestone(milestone: Milestone, thresholds: &AssessmentThresholds) -> Self {
        match milestone {
            Milestone::Reached(year) if year <= thresholds.quick_break_even_years => {
                BreakEvenRating::Quick
            }
            Milestone::Reached(year) if year <= thresholds.moderate_break_even_years => {
                BreakEvenRating::Moderate
            }
            _ => BreakEvenRating::Long,
        }
    }
}

impl fmt::Display for BreakEvenRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BreakEvenRating::Quick => "Quick break-even",
            BreakEvenRating::Moderate => "Moderate break-even period",
            BreakEvenRating::Long => "Long break-even period",
        };
        f.write_str(text)
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,

    /// Down payment plus closing costs
    pub initial_investment: f64,

    // Tax shielding
    pub total_tax_savings: f64,
    pub average_annual_tax_savings: f64,
    /// Total tax savings as a percent of the initial investment
    pub tax_savings_pct_of_investment: f64,

    // Cash flow
    pub total_cash_flow: f64,
    pub total_net_profit_loss: f64,
    pub total_pmi_paid: f64,
    /// Lowest monthly cash flow of any year
    pub max_monthly_loss: f64,
    pub mean_monthly_cash_flow: f64,
    /// Population standard deviation across years
    pub std_monthly_cash_flow: f64,
    pub first_year_cash_on_cash: f64,

    // Milestones
    pub break_even: Milestone,
    pub pmi_removal: Milestone,
    /// Month equity first reaches the PMI threshold paying only the schedule
    pub months_to_pmi_threshold: Option<u32>,

    // Exit at the horizon
    pub final_property_value: f64,
    pub final_equity: f64,
    pub final_total_profit: f64,
    pub final_total_roi: f64,
    pub exit_irr: Option<f64>,

    /// Effect of the configured extra monthly payment
    pub payoff: PayoffAnalysis,

    // Assessment
    pub income_rating: IncomeRating,
    pub break_even_rating: BreakEvenRating,
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub years: Vec<YearProjection>,
    pub summary: ProjectionSummary,
    pub comparison: Option<Vec<ComparisonRow>>,
}

/// Mean and population standard deviation, (0, 0) for an empty slice
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Folds a projection series into its summary
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    thresholds: AssessmentThresholds,
    payoff: PayoffAnalysis,
    months_to_pmi_threshold: Option<u32>,
    comparison: Option<ComparisonSimulator>,
}

impl ReportAggregator {
    pub fn new(engine: &ProjectionEngine) -> Self {
        let config = engine.config();
        Self {
            thresholds: config.assessment.clone(),
            payoff: engine.loan().payoff_analysis(config.extra_monthly_payment),
            months_to_pmi_threshold: engine.equity_tracker().months_to_threshold(),
            comparison: ComparisonSimulator::from_config(config),
        }
    }

    pub fn summarize(&self, result: &ProjectionResult) -> ProjectionSummary {
        let years = &result.years;
        let outlay = result.initial_outlay;
        let count = years.len();

        let total_tax_savings: f64 = years.iter().map(|y| y.tax_savings).sum();
        let total_cash_flow: f64 = years.iter().map(|y| y.annual_cash_flow).sum();
        let total_net_profit_loss: f64 = years.iter().map(|y| y.net_profit_loss).sum();
        let total_pmi_paid: f64 = years.iter().map(|y| y.monthly_pmi * 12.0).sum();

        let monthly: Vec<f64> = years.iter().map(|y| y.monthly_cash_flow).collect();
        let (mean_monthly_cash_flow, std_monthly_cash_flow) = mean_and_std(&monthly);
        let max_monthly_loss = monthly.iter().copied().fold(f64::INFINITY, f64::min);

        let break_even = Milestone::first(years, |y| y.cumulative_cash_flow >= 0.0);
        let pmi_removal = Milestone::first(years, |y| !y.pmi_required);
        let first_year_cash_on_cash = result.first_year().map_or(0.0, |y| y.cash_on_cash_return);

        let irr = result.final_year().and_then(|last| {
            exit_irr(outlay, &result.annual_cash_flows(), last.net_sale_proceeds)
        });

        let summary = ProjectionSummary {
            years: count as u32,
            initial_investment: outlay,
            total_tax_savings,
            average_annual_tax_savings: if count > 0 {
                total_tax_savings / count as f64
            } else {
                0.0
            },
            tax_savings_pct_of_investment: if outlay > 0.0 {
                total_tax_savings / outlay * 100.0
            } else {
                0.0
            },
            total_cash_flow,
            total_net_profit_loss,
            total_pmi_paid,
            max_monthly_loss: if max_monthly_loss.is_finite() {
                max_monthly_loss
            } else {
                0.0
            },
            mean_monthly_cash_flow,
            std_monthly_cash_flow,
            first_year_cash_on_cash,
            break_even,
            pmi_removal,
            months_to_pmi_threshold: self.months_to_pmi_threshold,
            final_property_value: result.final_year().map_or(0.0, |y| y.property_value),
            final_equity: result.final_year().map_or(0.0, |y| y.equity),
            final_total_profit: result.final_year().map_or(0.0, |y| y.total_profit),
            final_total_roi: result.final_year().map_or(0.0, |y| y.total_roi),
            exit_irr: irr,
            payoff: self.payoff.clone(),
            income_rating: IncomeRating::from_cash_on_cash(
                first_year_cash_on_cash,
                &self.thresholds,
            ),
            break_even_rating: BreakEvenRating::from_milestone(break_even, &self.thresholds),
        };

        debug!(
            "Summary over {} years: break-even {}, PMI removal {}, ROI {:.1}%",
            summary.years, summary.break_even, summary.pmi_removal, summary.final_total_roi
        );
        summary
    }

    /// Summary plus the comparison rows when a benchmark is configured
    pub fn aggregate(&self, result: ProjectionResult) -> ProjectionReport {
        let summary = self.summarize(&result);
        let comparison = self
            .comparison
            .as_ref()
            .map(|sim| sim.rows(&result.years, result.initial_outlay));

        ProjectionReport {
            years: result.years,
            summary,
            comparison,
        }
    }
}

impl ProjectionEngine {
    /// Project and summarize in one step
    pub fn report(&self) -> ProjectionReport {
        ReportAggregator::new(self).aggregate(self.project())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ComparisonConfig, ExpenseAmount, ExpenseLine, ExpenseProfile, InvestmentConfig,
    };
    use approx::assert_relative_eq;

    /// Small all-cash rental: 2,400/yr cash flow on a 20,000 outlay
    fn small_rental() -> InvestmentConfig {
        InvestmentConfig {
            purchase_price: 20_000.0,
            down_payment: 20_000.0,
            closing_costs: 0.0,
            mortgage_annual_rate: 0.05,
            loan_term_years: 30,
            monthly_rent: 1_000.0,
            rental_growth_rate: 0.0,
            expenses: ExpenseProfile::new(vec![ExpenseLine::fixed("Operating", 800.0)]),
            mortgage_insurance: ExpenseAmount::fixed(0.0),
            property_appreciation_rate: 0.0,
            expense_inflation_rate: 0.0,
            analysis_years: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_mean_and_population_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(mean, 5.0, epsilon = 1e-12);
        assert_relative_eq!(std, 2.0, epsilon = 1e-12);
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_break_even_first_qualifying_year() {
        let report = ProjectionEngine::new(small_rental()).unwrap().report();
        let summary = &report.summary;

        // 8 × 2,400 = 19,200 < 20,000 <= 9 × 2,400
        assert_eq!(summary.break_even, Milestone::Reached(9));
        assert_eq!(summary.break_even_rating, BreakEvenRating::Moderate);
        assert_relative_eq!(summary.first_year_cash_on_cash, 12.0, epsilon = 1e-9);
        assert_eq!(summary.income_rating, IncomeRating::Strong);
        assert_relative_eq!(summary.mean_monthly_cash_flow, 200.0, epsilon = 1e-9);
        assert_relative_eq!(summary.std_monthly_cash_flow, 0.0, epsilon = 1e-9);
        assert_relative_eq!(summary.max_monthly_loss, 200.0, epsilon = 1e-9);
        assert_relative_eq!(summary.total_cash_flow, 24_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_break_even_not_reached() {
        let config = small_rental().with_analysis_years(5);
        let summary = ProjectionEngine::new(config).unwrap().report().summary;
        assert_eq!(summary.break_even, Milestone::NotReached);
        assert_eq!(summary.break_even.year(), None);
        assert_eq!(summary.break_even_rating, BreakEvenRating::Long);
    }

    #[test]
    fn test_pmi_totals_and_removal() {
        let config = InvestmentConfig {
            mortgage_annual_rate: 0.06,
            ..Default::default()
        };
        let report = ProjectionEngine::new(config).unwrap().report();
        let summary = &report.summary;

        let expected: f64 = report.years.iter().map(|y| y.monthly_pmi * 12.0).sum();
        assert_relative_eq!(summary.total_pmi_paid, expected, epsilon = 1e-6);
        // 15k down on 360k at 6% with 3% appreciation crosses 20% equity in year 5
        assert_eq!(summary.pmi_removal, Milestone::Reached(5));
        assert_relative_eq!(summary.total_pmi_paid, 237.0 * 12.0 * 4.0, epsilon = 1e-6);
        assert!(summary.months_to_pmi_threshold.is_some());
    }

    #[test]
    fn test_exit_irr_is_finite_for_typical_purchase() {
        let summary = ProjectionEngine::new(InvestmentConfig::default()).unwrap().report().summary;
        let irr = summary.exit_irr.unwrap();
        assert!(irr.is_finite());
        assert!(irr > -1.0 && irr < 1.0, "implausible exit IRR {}", irr);
    }

    #[test]
    fn test_tax_savings_pct_of_investment() {
        let config = InvestmentConfig {
            federal_tax_rate: 0.22,
            state_tax_rate: 0.05,
            ..Default::default()
        };
        let summary = ProjectionEngine::new(config).unwrap().report().summary;
        assert!(summary.total_tax_savings > 0.0);
        assert_relative_eq!(
            summary.tax_savings_pct_of_investment,
            summary.total_tax_savings / summary.initial_investment * 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            summary.average_annual_tax_savings,
            summary.total_tax_savings / 15.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_comparison_rows_only_when_configured() {
        let report = ProjectionEngine::new(InvestmentConfig::default()).unwrap().report();
        assert!(report.comparison.is_none());

        let config = InvestmentConfig {
            comparison: Some(ComparisonConfig {
                initial_investment: None,
                monthly_contribution: 1_000.0,
                annual_return: 0.08,
            }),
            ..Default::default()
        };
        let report = ProjectionEngine::new(config).unwrap().report();
        assert_eq!(report.comparison.unwrap().len(), report.years.len());
    }

    #[test]
    fn test_assessment_thresholds() {
        let t = AssessmentThresholds::default();
        assert_eq!(IncomeRating::from_cash_on_cash(8.5, &t), IncomeRating::Strong);
        assert_eq!(IncomeRating::from_cash_on_cash(8.0, &t), IncomeRating::Moderate);
        assert_eq!(IncomeRating::from_cash_on_cash(5.0, &t), IncomeRating::Weak);
        assert_eq!(
            BreakEvenRating::from_milestone(Milestone::Reached(5), &t),
            BreakEvenRating::Quick
        );
        assert_eq!(
            BreakEvenRating::from_milestone(Milestone::Reached(10), &t),
            BreakEvenRating::Moderate
        );
        assert_eq!(
            BreakEvenRating::from_milestone(Milestone::Reached(11), &t),
            BreakEvenRating::Long
        );
    }

    #[test]
    fn test_milestone_display() {
        assert_eq!(Milestone::Reached(4).to_string(), "Year 4");
        assert_eq!(Milestone::NotReached.to_string(), "Not reached");
    }
}
