//! Running state carried from one projection year to the next

/// Accumulator for the year fold
///
/// Only the cumulative cash position flows forward; everything else in a
/// `YearProjection` is a pure function of the configuration and the year index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    /// Last closed year (0 before the first year)
    pub year: u32,

    /// Down payment plus closing costs
    pub initial_outlay: f64,

    /// Running cash position, seeded at minus the initial outlay
    pub cumulative_cash_flow: f64,
}

impl ProjectionState {
    /// State at purchase, before any year has closed
    pub fn opening(initial_outlay: f64) -> Self {
        Self {
            year: 0,
            initial_outlay,
            cumulative_cash_flow: -initial_outlay,
        }
    }

    /// Close the next year with its annual cash flow and return the new cumulative
    pub fn close_year(&mut self, annual_cash_flow: f64) -> f64 {
        self.year += 1;
        self.cumulative_cash_flow += annual_cash_flow;
        self.cumulative_cash_flow
    }
}
