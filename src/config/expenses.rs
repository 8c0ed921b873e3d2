//! Operating expense profile
//!
//! Each line is either a fixed monthly amount or a rate applied to a base
//! (purchase price, loan amount or monthly rent). Input records carry optional
//! `rate` and `amount` columns; conversion into the typed form rejects lines that
//! set both or neither.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_expense_rate, ensure_finite, ConfigError};

/// Quantity a rate-based expense is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseBase {
    /// Annual rate of the purchase price, spread over 12 months
    PropertyValue,
    /// Share of the monthly rent
    MonthlyRent,
    /// Annual rate of the original loan amount, spread over 12 months
    LoanAmount,
}

/// Year-1 quantities that rate-based expenses resolve against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseBasis {
    pub property_value: f64,
    pub monthly_rent: f64,
    pub loan_amount: f64,
}

/// How a single expense is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpenseAmount", into = "RawExpenseAmount")]
pub enum ExpenseAmount {
    Rate { rate: f64, base: ExpenseBase },
    FixedAmount { amount: f64 },
}

impl ExpenseAmount {
    pub fn fixed(amount: f64) -> Self {
        ExpenseAmount::FixedAmount { amount }
    }

    pub fn rate(rate: f64, base: ExpenseBase) -> Self {
        ExpenseAmount::Rate { rate, base }
    }

    /// Resolve to a monthly amount in year-1 terms
    pub fn monthly_amount(&self, basis: &ExpenseBasis) -> f64 {
        let amount = match *self {
            ExpenseAmount::FixedAmount { amount } => amount,
            ExpenseAmount::Rate { rate, base } => match base {
                ExpenseBase::PropertyValue => rate * basis.property_value / 12.0,
                ExpenseBase::LoanAmount => rate * basis.loan_amount / 12.0,
                ExpenseBase::MonthlyRent => rate * basis.monthly_rent,
            },
        };
        amount.max(0.0)
    }

    /// Build from the optional input columns
    fn from_parts(
        label: &str,
        rate: Option<f64>,
        amount: Option<f64>,
        base: Option<ExpenseBase>,
        default_base: ExpenseBase,
    ) -> Result<Self, ConfigError> {
        match (rate, amount) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingExpenseInput(label.to_string())),
            (None, None) => Err(ConfigError::MissingExpenseInput(label.to_string())),
            (Some(rate), None) => Ok(ExpenseAmount::Rate {
                rate: ensure_expense_rate(label, rate)?,
                base: base.unwrap_or(default_base),
            }),
            (None, Some(amount)) => {
                ensure_finite("expense amount", amount)?;
                if amount < 0.0 {
                    return Err(ConfigError::NegativeExpense {
                        name: label.to_string(),
                        kind: "amount",
                        value: amount,
                    });
                }
                if base.is_some() {
                    return Err(ConfigError::BaseWithoutRate(label.to_string()));
                }
                Ok(ExpenseAmount::FixedAmount { amount })
            }
        }
    }

    fn into_parts(self) -> (Option<f64>, Option<f64>, Option<ExpenseBase>) {
        match self {
            ExpenseAmount::Rate { rate, base } => (Some(rate), None, Some(base)),
            ExpenseAmount::FixedAmount { amount } => (None, Some(amount), None),
        }
    }
}

impl Default for ExpenseAmount {
    fn default() -> Self {
        ExpenseAmount::FixedAmount { amount: 0.0 }
    }
}

/// Serialized form of a standalone amount (mortgage insurance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExpenseAmount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<ExpenseBase>,
}

impl TryFrom<RawExpenseAmount> for ExpenseAmount {
    type Error = ConfigError;

    fn try_from(raw: RawExpenseAmount) -> Result<Self, Self::Error> {
        ExpenseAmount::from_parts(
            "mortgage_insurance",
            raw.rate,
            raw.amount,
            raw.base,
            ExpenseBase::LoanAmount,
        )
    }
}

impl From<ExpenseAmount> for RawExpenseAmount {
    fn from(amount: ExpenseAmount) -> Self {
        let (rate, amount, base) = amount.into_parts();
        RawExpenseAmount { rate, amount, base }
    }
}

/// One named operating expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpenseLine", into = "RawExpenseLine")]
pub struct ExpenseLine {
    pub name: String,
    pub amount: ExpenseAmount,
    /// Counts toward the tax-basis expense total
    pub deductible: bool,
}

impl ExpenseLine {
    pub fn fixed(name: &str, monthly_amount: f64) -> Self {
        Self {
            name: name.to_string(),
            amount: ExpenseAmount::fixed(monthly_amount),
            deductible: true,
        }
    }

    pub fn rate(name: &str, rate: f64, base: ExpenseBase) -> Self {
        Self {
            name: name.to_string(),
            amount: ExpenseAmount::rate(rate, base),
            deductible: true,
        }
    }

    pub fn non_deductible(mut self) -> Self {
        self.deductible = false;
        self
    }

    pub fn monthly_amount(&self, basis: &ExpenseBasis) -> f64 {
        self.amount.monthly_amount(basis)
    }
}

/// Input record for an expense line (JSON object or CSV row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExpenseLine {
    pub name: String,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub base: Option<ExpenseBase>,
    #[serde(default)]
    pub deductible: Option<bool>,
}

impl TryFrom<RawExpenseLine> for ExpenseLine {
    type Error = ConfigError;

    fn try_from(raw: RawExpenseLine) -> Result<Self, Self::Error> {
        let amount = ExpenseAmount::from_parts(
            &raw.name,
            raw.rate,
            raw.amount,
            raw.base,
            ExpenseBase::PropertyValue,
        )?;
        Ok(Self {
            name: raw.name,
            amount,
            deductible: raw.deductible.unwrap_or(true),
        })
    }
}

impl From<ExpenseLine> for RawExpenseLine {
    fn from(line: ExpenseLine) -> Self {
        let (rate, amount, base) = line.amount.into_parts();
        RawExpenseLine {
            name: line.name,
            rate,
            amount,
            base,
            deductible: Some(line.deductible),
        }
    }
}

/// Ordered list of operating expense lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseProfile {
    lines: Vec<ExpenseLine>,
}

impl ExpenseProfile {
    pub fn new(lines: Vec<ExpenseLine>) -> Self {
        Self { lines }
    }

    pub fn with_line(mut self, line: ExpenseLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn lines(&self) -> &[ExpenseLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Monthly total of every line in year-1 terms
    pub fn monthly_total(&self, basis: &ExpenseBasis) -> f64 {
        self.lines.iter().map(|l| l.monthly_amount(basis)).sum()
    }

    /// Monthly total of the deductible lines in year-1 terms
    pub fn monthly_deductible(&self, basis: &ExpenseBasis) -> f64 {
        self.lines
            .iter()
            .filter(|l| l.deductible)
            .map(|l| l.monthly_amount(basis))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis() -> ExpenseBasis {
        ExpenseBasis {
            property_value: 365_000.0,
            monthly_rent: 2_499.0,
            loan_amount: 349_000.0,
        }
    }

    #[test]
    fn test_rate_on_property_value_is_annual() {
        let taxes = ExpenseLine::rate("Property taxes", 0.01, ExpenseBase::PropertyValue);
        assert!((taxes.monthly_amount(&basis()) - 365_000.0 * 0.01 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_on_rent_is_monthly() {
        let management = ExpenseLine::rate("Management", 0.06, ExpenseBase::MonthlyRent);
        assert!((management.monthly_amount(&basis()) - 149.94).abs() < 1e-9);
    }

    #[test]
    fn test_rate_on_loan_amount() {
        let pmi = ExpenseAmount::rate(0.01, ExpenseBase::LoanAmount);
        assert!((pmi.monthly_amount(&basis()) - 349_000.0 * 0.01 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_inputs_resolve_to_zero() {
        assert_eq!(ExpenseAmount::fixed(0.0).monthly_amount(&basis()), 0.0);
        assert_eq!(
            ExpenseAmount::rate(0.0, ExpenseBase::MonthlyRent).monthly_amount(&basis()),
            0.0
        );
    }

    #[test]
    fn test_both_rate_and_amount_rejected() {
        let raw = RawExpenseLine {
            name: "Insurance".to_string(),
            rate: Some(0.005),
            amount: Some(208.0),
            base: None,
            deductible: None,
        };
        let err = ExpenseLine::try_from(raw).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingExpenseInput(ref n) if n == "Insurance"));
    }

    #[test]
    fn test_neither_rate_nor_amount_rejected() {
        let raw = RawExpenseLine {
            name: "HOA".to_string(),
            rate: None,
            amount: None,
            base: None,
            deductible: None,
        };
        assert!(matches!(
            ExpenseLine::try_from(raw),
            Err(ConfigError::MissingExpenseInput(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let raw = RawExpenseLine {
            name: "Trash".to_string(),
            rate: None,
            amount: Some(-30.0),
            base: None,
            deductible: None,
        };
        assert!(matches!(
            ExpenseLine::try_from(raw),
            Err(ConfigError::NegativeExpense { kind: "amount", .. })
        ));
    }

    #[test]
    fn test_json_forms() {
        let json = r#"[
            {"name": "Property taxes", "rate": 0.01},
            {"name": "Management", "rate": 0.06, "base": "monthly_rent"},
            {"name": "Vacancy", "rate": 0.06, "base": "monthly_rent", "deductible": false},
            {"name": "Insurance", "amount": 208}
        ]"#;
        let profile: ExpenseProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.len(), 4);
        assert_eq!(
            profile.lines()[0].amount,
            ExpenseAmount::rate(0.01, ExpenseBase::PropertyValue)
        );
        assert!(!profile.lines()[2].deductible);
        assert_eq!(profile.lines()[3].amount, ExpenseAmount::fixed(208.0));

        let total = profile.monthly_total(&basis());
        let deductible = profile.monthly_deductible(&basis());
        assert!((total - deductible - 149.94).abs() < 1e-9);
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let raw = RawExpenseLine {
            name: "Management".to_string(),
            rate: Some(5.0),
            amount: None,
            base: Some(ExpenseBase::MonthlyRent),
            deductible: None,
        };
        assert!(matches!(
            ExpenseLine::try_from(raw),
            Err(ConfigError::ExpenseRateOutOfRange { value, .. }) if value == 5.0
        ));

        let json = r#"[{"name": "Taxes", "rate": 7.5}]"#;
        let err = serde_json::from_str::<ExpenseProfile>(json).unwrap_err();
        assert!(err.to_string().contains("rate must be within [0, 1]"));

        let json = r#"{"rate": 3.0}"#;
        assert!(serde_json::from_str::<ExpenseAmount>(json).is_err());
    }

    #[test]
    fn test_json_conflict_surfaces_as_error() {
        let json = r#"[{"name": "Insurance", "rate": 0.005, "amount": 100}]"#;
        let err = serde_json::from_str::<ExpenseProfile>(json).unwrap_err();
        assert!(err.to_string().contains("both a rate and an amount"));
    }

    #[test]
    fn test_serialize_preserves_variant() {
        let profile = ExpenseProfile::default()
            .with_line(ExpenseLine::fixed("Trash", 30.0))
            .with_line(ExpenseLine::rate("Maintenance", 0.01, ExpenseBase::PropertyValue));
        let json = serde_json::to_string(&profile).unwrap();
        let back: ExpenseProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
