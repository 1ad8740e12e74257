//! Application state for the web layer.

use std::sync::Arc;

use crate::config::{Settings, StatutoryRates};
use crate::db::Db;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// database handle, runtime settings and statutory rates.
#[derive(Clone)]
pub struct AppState {
    db: Db,
    settings: Arc<Settings>,
    rates: Arc<StatutoryRates>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(db: Db, settings: Settings, rates: StatutoryRates) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
            rates: Arc::new(rates),
        }
    }

    /// Returns the database handle.
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Returns the runtime settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the statutory rates.
    pub fn rates(&self) -> &StatutoryRates {
        &self.rates
    }
}
