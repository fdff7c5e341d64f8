//! # Error Types
//!
//! Domain-specific error types for mill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mill-core errors (this file)                                          │
//! │  ├── CoreError        - Ledger precondition and rule violations        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mill-db errors (separate crate)                                       │
//! │  └── DbError          - Database failures, wraps CoreError rejections  │
//! │                                                                         │
//! │  mill-server errors                                                    │
//! │  └── ApiError         - Status code + field-keyed message map          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is a recoverable rejection. None of them is raised after a
//! partial mutation: the ledger checks all preconditions before touching state.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a rejection, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A derived field does not match its recomputation, an input is out of
    /// range, or a required relation is missing.
    ValidationFailed,
    /// `cash_in_hand` or `capital` would go below zero.
    InsufficientFunds,
    /// `munji_inventory` would go below zero.
    InsufficientInventory,
    /// A uniqueness rule was violated (duplicate supplier/category name).
    ConstraintViolation,
}

// =============================================================================
// Ledger Account
// =============================================================================

/// The monetary balances a funds check can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Account {
    Capital,
    CashInHand,
}

impl Account {
    pub fn field_name(&self) -> &'static str {
        match self {
            Account::Capital => "capital",
            Account::CashInHand => "cash_in_hand",
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the ledger and the record rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Not enough funds on the named account.
    ///
    /// ## User Workflow
    /// ```text
    /// Record Cash purchase (total 500.00)
    ///      │
    ///      ▼
    /// Check cash_in_hand: 300.00
    ///      │
    ///      ▼
    /// InsufficientFunds { account: CashInHand, available: 300.00, requested: 500.00 }
    ///      │
    ///      ▼
    /// Nothing persisted, client sees {"cash_in_hand": ["Insufficient ..."]}
    /// ```
    #[error("Insufficient {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        account: Account,
        available: Money,
        requested: Money,
    },

    /// Not enough munji in stock.
    #[error("Insufficient munji inventory: available {available}, requested {requested}")]
    InsufficientInventory { available: Money, requested: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            CoreError::InsufficientInventory { .. } => ErrorKind::InsufficientInventory,
            CoreError::Validation(ValidationError::Duplicate { .. }) => {
                ErrorKind::ConstraintViolation
            }
            CoreError::Validation(_) => ErrorKind::ValidationFailed,
        }
    }

    /// The field the rejection is keyed on in the client-facing message map.
    pub fn field(&self) -> &str {
        match self {
            CoreError::InsufficientFunds { account, .. } => account.field_name(),
            CoreError::InsufficientInventory { .. } => "munji_inventory",
            CoreError::Validation(e) => e.field(),
        }
    }

    /// The human-readable message without the "Validation error:" prefix.
    pub fn message(&self) -> String {
        match self {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any ledger precondition is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value is outside an inclusive range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A client-supplied derived value disagrees with the recomputation.
    #[error("{field} must equal {expected}, got {supplied}")]
    Mismatch {
        field: String,
        supplied: Money,
        expected: Money,
    },

    /// A referenced record does not exist.
    #[error("{field} '{id}' does not exist")]
    UnknownReference { field: String, id: String },

    /// Duplicate value (e.g., duplicate supplier name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::UnknownReference { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }

    pub fn unknown_reference(field: impl Into<String>, id: impl Into<String>) -> Self {
        ValidationError::UnknownReference {
            field: field.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
