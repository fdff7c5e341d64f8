//! # Validation Module
//!
//! Input validation utilities for the mill ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Type validation (JSON deserialization, Money parsing)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record rules (mill-core)                                     │
//! │  ├── THIS MODULE: field-level checks                                   │
//! │  └── purchase / production / expense: derived totals                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger preconditions (funds, inventory)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (catalog names)                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use mill_core::validation::{validate_name, validate_positive};
//! use mill_core::Money;
//!
//! let name = validate_name("name", "  Acme Traders ").unwrap();
//! assert_eq!(name, "Acme Traders");
//!
//! validate_positive("quantity", Money::from_major(10)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog name or record title.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` (255) characters
///
/// ## Returns
/// The trimmed value.
///
/// ## Example
/// ```rust
/// use mill_core::validation::validate_name;
///
/// assert!(validate_name("name", "Basmati").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// assert!(validate_name("title", &"x".repeat(256)).is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Value must be strictly greater than zero and at most [`Money::MAX`].
pub fn validate_positive(field: &str, value: Money) -> ValidationResult<()> {
    if !value.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    validate_max_amount(field, value)
}

/// Value must be zero or greater and at most [`Money::MAX`].
pub fn validate_non_negative(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    validate_max_amount(field, value)
}

/// Magnitude must not exceed [`Money::MAX`] (12 digits, 2 decimal places).
///
/// ## Example
/// ```rust
/// use mill_core::validation::validate_max_amount;
/// use mill_core::Money;
///
/// assert!(validate_max_amount("capital_delta", Money::MAX).is_ok());
/// assert!(validate_max_amount("inventory_delta", -Money::MAX).is_ok());
/// assert!(validate_max_amount("capital_delta", Money::from_major(10_000_000_000)).is_err());
/// ```
pub fn validate_max_amount(field: &str, value: Money) -> ValidationResult<()> {
    if value > Money::MAX || value < -Money::MAX {
        return Err(out_of_range(field));
    }

    Ok(())
}

/// `a × b` rounded to hundredths, rejected when it exceeds [`Money::MAX`].
pub fn bounded_product(field: &str, a: Money, b: Money) -> ValidationResult<Money> {
    let product = a.multiply(b).ok_or_else(|| out_of_range(field))?;
    validate_max_amount(field, product)?;
    Ok(product)
}

/// `a + b`, rejected when it exceeds [`Money::MAX`].
pub fn bounded_sum(field: &str, a: Money, b: Money) -> ValidationResult<Money> {
    let sum = a.checked_add(b).ok_or_else(|| out_of_range(field))?;
    validate_max_amount(field, sum)?;
    Ok(sum)
}

/// `a - b`, rejected when it leaves the `±`[`Money::MAX`] range.
pub fn bounded_difference(field: &str, a: Money, b: Money) -> ValidationResult<Money> {
    let difference = a.checked_sub(b).ok_or_else(|| out_of_range(field))?;
    validate_max_amount(field, difference)?;
    Ok(difference)
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: (-Money::MAX).to_string(),
        max: Money::MAX.to_string(),
    }
}

/// Validates a fraction in `[0, 1]` (wastage, quality).
///
/// ## Example
/// ```rust
/// use mill_core::validation::validate_fraction;
/// use mill_core::Money;
///
/// assert!(validate_fraction("wastage", Money::from_hundredths(5)).is_ok());
/// assert!(validate_fraction("wastage", Money::one()).is_ok());
/// assert!(validate_fraction("wastage", Money::from_hundredths(101)).is_err());
/// ```
pub fn validate_fraction(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() || value > Money::one() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Money::zero().to_string(),
            max: Money::one().to_string(),
        });
    }

    Ok(())
}

/// Validates a bag count on a purchase.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_bag_count(bags: i64) -> ValidationResult<()> {
    if bags <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "total_bags".to_string(),
        });
    }

    Ok(())
}

/// A client-supplied derived value, when present, must equal the recomputation.
pub fn validate_matches(
    field: &str,
    supplied: Option<Money>,
    expected: Money,
) -> ValidationResult<()> {
    match supplied {
        Some(supplied) if supplied != expected => Err(ValidationError::Mismatch {
            field: field.to_string(),
            supplied,
            expected,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID (36 characters with hyphens)
///
/// ## Example
/// ```rust
/// use mill_core::validation::validate_uuid;
///
/// assert!(validate_uuid("supplier_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("supplier_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
