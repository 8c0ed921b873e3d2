//! Internal Rate of Return (IRR) calculation
//!
//! Used for the exit IRR of buying, operating and selling the property.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 500;

/// Lowest periodic rate searched (-99%)
const MIN_RATE: f64 = -0.99;
/// Highest periodic rate searched (1000%)
const MAX_RATE: f64 = 10.0;

/// Annual IRR of a series of periodic cash flows
///
/// `cashflows[0]` is at time 0 (positive = inflow, negative = outflow). Solves for
/// the periodic rate with Newton-Raphson, falls back to bisection when Newton stalls,
/// then annualizes with `periods_per_year`. None if the flows never change sign or
/// no root lies in the searched range.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() || periods_per_year == 0 {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let periodic = newton(cashflows).or_else(|| bisection(cashflows))?;
    Some(annualize(periodic, periods_per_year))
}

/// Exit IRR: pay the outlay, collect each year's cash flow, sell at the end
///
/// Flows are `[-outlay, cf_1, ..., cf_N + net_sale_proceeds]` at yearly spacing.
pub fn exit_irr(
    initial_outlay: f64,
    annual_cash_flows: &[f64],
    net_sale_proceeds: f64,
) -> Option<f64> {
    let mut flows = Vec::with_capacity(annual_cash_flows.len() + 1);
    flows.push(-initial_outlay);
    flows.extend_from_slice(annual_cash_flows);
    if let Some(last) = flows.last_mut() {
        *last += net_sale_proceeds;
    }
    calculate_irr(&flows, 1)
}

fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// NPV at a periodic rate and its derivative with respect to the rate
fn npv_with_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, dnpv), (t, &cf)| {
            let discount = growth.powi(t as i32);
            (npv + cf / discount, dnpv - t as f64 * cf / (discount * growth))
        })
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    npv_with_derivative(cashflows, rate).0
}

fn newton(cashflows: &[f64]) -> Option<f64> {
    let mut rate = 0.05;
    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_with_derivative(cashflows, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = (rate - value / slope).clamp(MIN_RATE, MAX_RATE);
        if !next.is_finite() {
            return None;
        }
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn bisection(cashflows: &[f64]) -> Option<f64> {
    let (mut low, mut high) = (MIN_RATE, MAX_RATE);
    let mut npv_low = npv(cashflows, low);
    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (low + high);
        let npv_mid = npv(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || 0.5 * (high - low) < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }
    None
}
