//! Projection engine for leveraged rental property purchases

mod cashflows;
mod engine;
mod equity;
mod expenses;
mod irr;
mod state;

pub use cashflows::{ProjectionResult, YearProjection};
pub use engine::ProjectionEngine;
pub use equity::{equity_pct, EquitySnapshot, EquityTracker};
pub use expenses::{ExpenseBreakdown, ExpenseProjector, ResolvedExpense};
pub use irr::{calculate_irr, exit_irr};
pub use state::ProjectionState;
