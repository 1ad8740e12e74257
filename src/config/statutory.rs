//! Statutory deduction rates.
//!
//! IGSS and ISR are percentage deductions mandated by law. Their rates are
//! loaded from a YAML file so they can be adjusted without a rebuild, with
//! compiled-in defaults when no file is configured.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single statutory deduction definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryEntry {
    /// The catalog name the deduction is registered under (e.g. "IGSS").
    pub name: String,
    /// The percentage rate applied to the prorated base salary.
    pub rate: Decimal,
}

/// The statutory deduction rates applied during payroll generation.
///
/// # Example
///
/// ```
/// use planilla::config::StatutoryRates;
///
/// let rates = StatutoryRates::default();
/// assert_eq!(rates.igss.name, "IGSS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// Social security employee contribution.
    pub igss: StatutoryEntry,
    /// Income tax withholding.
    pub isr: StatutoryEntry,
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            igss: StatutoryEntry {
                name: "IGSS".to_string(),
                rate: Decimal::from_str("4.83").unwrap_or(Decimal::ZERO),
            },
            isr: StatutoryEntry {
                name: "ISR".to_string(),
                rate: Decimal::from_str("5.00").unwrap_or(Decimal::ZERO),
            },
        }
    }
}

impl StatutoryRates {
    /// Loads rates from the specified YAML file.
    ///
    /// Returns an error if the file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| AppError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads rates from the given path, falling back to defaults when no
    /// path is configured.
    pub fn load_or_default(path: Option<&str>) -> AppResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
