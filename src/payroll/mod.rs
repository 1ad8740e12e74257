//! Payroll computation.
//!
//! This module contains the calculation logic for payroll generation:
//! salary proration by attendance days, statutory deduction bootstrap,
//! expansion of catalog entries with per-employee overrides into line
//! items, and the engine that chains those steps for a whole period.

mod engine;
mod items;
mod proration;
mod statutory;

pub use engine::{
    CloseSummary, GenerationSummary, close_period, generate_for_period, recalculate_period,
    recalculate_record,
};
pub use items::{ResolvedItem, expand_catalog, item_amount, loan_items};
pub use proration::{prorate, resolve_payable_days};
pub use statutory::{ensure_statutory_entries, statutory_names};
