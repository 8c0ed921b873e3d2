//! Error types for configuration loading and validation
//!
//! Projection itself never fails: every degenerate arithmetic case has a defined
//! outcome. All errors are raised before the first year is computed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: f64,
        min: f64,
    },

    #[error("Down payment ({down_payment}) exceeds purchase price ({purchase_price})")]
    DownPaymentExceedsPrice {
        down_payment: f64,
        purchase_price: f64,
    },

    #[error("Combined tax rate {combined} exceeds 1.0 (federal {federal} + state {state})")]
    CombinedTaxRate {
        federal: f64,
        state: f64,
        combined: f64,
    },

    #[error("Expense line '{0}' sets both a rate and an amount")]
    ConflictingExpenseInput(String),

    #[error("Expense line '{0}' sets neither a rate nor an amount")]
    MissingExpenseInput(String),

    #[error("Expense line '{name}' has a negative {kind}: {value}")]
    NegativeExpense {
        name: String,
        kind: &'static str,
        value: f64,
    },

    #[error("Expense line '{name}' rate must be within [0, 1], got {value}")]
    ExpenseRateOutOfRange { name: String, value: f64 },

    #[error("Expense line '{0}' sets a base for a fixed amount")]
    BaseWithoutRate(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse expense CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Reject NaN and infinities
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(value)
}

/// Rates are fractions per period and must lie in [0, 1]
pub(crate) fn ensure_fraction(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    ensure_in_range(field, value, 0.0, 1.0)
}

/// Expense rates are fractions of their base: [0, 1]
pub(crate) fn ensure_expense_rate(name: &str, rate: f64) -> Result<f64, ConfigError> {
    ensure_finite("expense rate", rate)?;
    if rate < 0.0 {
        return Err(ConfigError::NegativeExpense {
            name: name.to_string(),
            kind: "rate",
            value: rate,
        });
    }
    if rate > 1.0 {
        return Err(ConfigError::ExpenseRateOutOfRange {
            name: name.to_string(),
            value: rate,
        });
    }
    Ok(rate)
}

pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ConfigError> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_bounds() {
        assert!(ensure_fraction("rate", 0.0).is_ok());
        assert!(ensure_fraction("rate", 1.0).is_ok());
        assert!(matches!(
            ensure_fraction("rate", 1.5),
            Err(ConfigError::OutOfRange { field: "rate", .. })
        ));
        assert!(matches!(
            ensure_fraction("rate", f64::NAN),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_expense_rate_bounds() {
        assert!(ensure_expense_rate("Vacancy", 0.0).is_ok());
        assert!(ensure_expense_rate("Vacancy", 1.0).is_ok());
        assert!(matches!(
            ensure_expense_rate("Vacancy", -0.05),
            Err(ConfigError::NegativeExpense { kind: "rate", .. })
        ));
        let err = ensure_expense_rate("Vacancy", 7.5).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ExpenseRateOutOfRange { ref name, .. } if name == "Vacancy"
        ));
        assert_eq!(
            err.to_string(),
            "Expense line 'Vacancy' rate must be within [0, 1], got 7.5"
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = ensure_non_negative("closing_costs", -10.0).unwrap_err();
        assert_eq!(err.to_string(), "closing_costs must not be negative, got -10");
    }
}
