//! # mill-core: Ledger Rules for the Mill
//!
//! This crate is the **heart** of the mill ledger. It holds the singleton
//! financial state, the rules that mutate it, and the record types, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mill Ledger Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    mill-server (axum)                           │   │
//! │  │    /api/purchases, /api/productions, /api/globals, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mill-db (Database Layer)                     │   │
//! │  │     SQLite transactions: ledger row + record row together       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mill-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  ledger   │  │   money   │  │ purchase  │  │ validation│  │   │
//! │  │   │  Ledger   │  │   Money   │  │production │  │   rules   │  │   │
//! │  │   │  Effect   │  │ round2    │  │  expense  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ledger`] - The `Ledger` state and its guarded operations
//! - [`money`] - Fixed-point amounts in hundredths (no floating point)
//! - [`types`] - Persisted records (Supplier, Purchase, Production, ...)
//! - [`purchase`], [`production`], [`expense`] - Request validation and derived totals
//! - [`query`] - List filters and pagination
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level checks
//!
//! ## Example Usage
//!
//! ```rust
//! use mill_core::{Ledger, Money, PaymentType, PurchaseEffect};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_capital(Money::from_major(1000)).unwrap();
//! ledger.move_capital_to_cash(Money::from_major(500)).unwrap();
//!
//! // 10 units at 50.00, paid in cash
//! let total = Money::from_major(10).multiply(Money::from_major(50)).unwrap();
//! ledger
//!     .apply_purchase(PurchaseEffect::new(PaymentType::Cash, total, Money::from_major(10)))
//!     .unwrap();
//!
//! assert_eq!(ledger.cash_in_hand(), Money::zero());
//! assert_eq!(ledger.munji_inventory(), Money::from_major(10));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod production;
pub mod purchase;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{Account, CoreError, CoreResult, ErrorKind, ValidationError};
pub use expense::{NewExpense, NewMiscellaneousCost};
pub use ledger::{Ledger, LedgerAdjustment, PurchaseEffect};
pub use money::{Money, ParseMoneyError};
pub use production::{NewProduction, ProductionTotals};
pub use purchase::{NewPurchase, PurchaseTotals};
pub use query::{Page, PageMeta, PageRequest, PurchaseFilter};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Primary key of the one and only ledger row.
pub const LEDGER_ID: i64 = 1;

/// Maximum length of catalog names and record titles.
pub const MAX_NAME_LENGTH: usize = 255;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on `per_page` for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;
