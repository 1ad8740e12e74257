//! Statutory deduction bootstrap.

use rusqlite::Connection;

use crate::config::StatutoryRates;
use crate::error::AppResult;
use crate::models::{CalcMethod, EntryKind};
use crate::store::catalog;

/// Makes sure the statutory deductions exist in the catalog.
///
/// Payroll generation calls this before recalculating so a fresh database
/// still deducts IGSS and ISR. Existing entries are left untouched, so an
/// administrator can adjust or deactivate them afterwards.
pub fn ensure_statutory_entries(conn: &Connection, rates: &StatutoryRates) -> AppResult<()> {
    for entry in [&rates.igss, &rates.isr] {
        if catalog::find_by_name(conn, &entry.name)?.is_none() {
            catalog::insert(
                conn,
                &entry.name,
                EntryKind::Deduction,
                CalcMethod::Percentage,
                entry.rate,
                Some("Statutory deduction"),
            )?;
        }
    }
    Ok(())
}

/// The catalog names treated as statutory when tagging item sources.
pub fn statutory_names(rates: &StatutoryRates) -> Vec<String> {
    vec![rates.igss.name.clone(), rates.isr.name.clone()]
}
