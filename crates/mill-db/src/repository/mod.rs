//! # Repository Module
//!
//! Database repository implementations for the mill ledger.
//!
//! ## Ledger-Coupled Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Recording a purchase / production / expense / misc cost                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. lock_ledger: take the write lock, read ledger row 1        │   │
//! │  │  2. check references (supplier, category, purchase)            │   │
//! │  │  3. apply the rule to the in-memory Ledger (may reject)        │   │
//! │  │  4. INSERT / UPDATE the record row                             │   │
//! │  │  5. save_ledger: UPDATE ledger row 1                           │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← record and ledger change land together                       │
//! │  Rejection or error → transaction dropped → ROLLBACK                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`LedgerRepository`](ledger::LedgerRepository) - Snapshot and operator adjustments
//! - [`CatalogRepository`](catalog::CatalogRepository) - Suppliers and categories
//! - [`PurchaseRepository`](purchase::PurchaseRepository) - Munji purchases
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Purchase expenses
//! - [`ProductionRepository`](production::ProductionRepository) - Rice production runs
//! - [`MiscCostRepository`](misc_cost::MiscCostRepository) - Miscellaneous costs

pub mod catalog;
pub mod expense;
pub mod ledger;
pub mod misc_cost;
pub mod production;
pub mod purchase;

use mill_core::CoreError;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Logs a domain rejection and wraps it. The caller's transaction is
/// dropped (rolled back) when the error propagates.
pub(crate) fn rejected(operation: &'static str, err: CoreError) -> DbError {
    warn!(
        operation,
        kind = ?err.kind(),
        field = err.field(),
        error = %err,
        "Ledger operation rejected"
    );
    DbError::Rejected(err)
}
