//! # mill-db: Database Layer for the Mill Ledger
//!
//! SQLite storage for the ledger and its records, using sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mill Ledger Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /api/purchases)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mill-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ LedgerRepo    │    │ 001_initial_ │  │   │
//! │  │   │ SqlitePool    │◄───│ PurchaseRepo  │    │   schema.sql │  │   │
//! │  │   │ Connection    │    │ ProductionRepo│    │              │  │   │
//! │  │   │ Management    │    │ ...           │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (mill.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mill_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mill.db")).await?;
//!
//! let purchase = db.purchases().create(&request).await?;
//! let ledger = db.ledger().get().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CatalogEntity, CatalogRepository};
pub use repository::expense::ExpenseRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::misc_cost::MiscCostRepository;
pub use repository::production::ProductionRepository;
pub use repository::purchase::PurchaseRepository;
