//! Configuration loading
//!
//! Reads an `InvestmentConfig` from JSON and, optionally, an expense profile from
//! CSV with columns `name,rate,amount,base,deductible`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::{ExpenseLine, ExpenseProfile, InvestmentConfig};
use crate::error::ConfigError;

/// Default location of the sample configuration
pub const DEFAULT_CONFIG_PATH: &str = "data/sample_property.json";

/// Load and validate a configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<InvestmentConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let file = File::open(path)?;
    load_config_from_reader(BufReader::new(file))
}

/// Load and validate a configuration from any reader
pub fn load_config_from_reader<R: Read>(reader: R) -> Result<InvestmentConfig, ConfigError> {
    let config: InvestmentConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Load an expense profile from a CSV file
pub fn load_expense_profile<P: AsRef<Path>>(path: P) -> Result<ExpenseProfile, ConfigError> {
    let path = path.as_ref();
    debug!("Loading expense profile from {}", path.display());
    let file = File::open(path)?;
    load_expense_profile_from_reader(file)
}

/// Load an expense profile from any reader (e.g. string buffer)
///
/// Empty `rate`/`amount`/`base`/`deductible` cells are treated as unset.
pub fn load_expense_profile_from_reader<R: Read>(reader: R) -> Result<ExpenseProfile, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut lines = Vec::new();
    for result in csv_reader.deserialize() {
        let line: ExpenseLine = result?;
        lines.push(line);
    }

    debug!("Loaded {} expense lines", lines.len());
    Ok(ExpenseProfile::new(lines))
}

/// Load a configuration and replace its expense lines with a CSV profile
pub fn load_config_with_expenses<P: AsRef<Path>, Q: AsRef<Path>>(
    config_path: P,
    expenses_path: Q,
) -> Result<InvestmentConfig, ConfigError> {
    let mut config = load_config(config_path)?;
    config.expenses = load_expense_profile(expenses_path)?;
    config.validate()?;
    Ok(config)
}
