//! # Domain Types
//!
//! Persisted records of the mill ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │    Purchase     │   │    Expense      │       │
//! │  │  ─────────────  │◄──│  ─────────────  │◄──│  ─────────────  │       │
//! │  │  id (UUID)      │   │  supplier_id    │   │  purchase_id    │       │
//! │  │  name (unique)  │   │  category_id    │   │  title          │       │
//! │  └─────────────────┘   │  quantity       │   │  amount         │       │
//! │  ┌─────────────────┐   │  unit_price     │   └─────────────────┘       │
//! │  │    Category     │◄──│  total_price    │                             │
//! │  │  ─────────────  │   │  payment_type   │   ┌─────────────────┐       │
//! │  │  id (UUID)      │   └─────────────────┘   │  Misc. Cost     │       │
//! │  │  name (unique)  │                         │  title, amount  │       │
//! │  └─────────────────┘   ┌─────────────────┐   └─────────────────┘       │
//! │                        │   Production    │                             │
//! │                        │  quantity_prod. │   ┌─────────────────┐       │
//! │                        │  quality_of_rice│   │  PaymentType    │       │
//! │                        │  total_quality  │   │  Cash | Credit  │       │
//! │                        │  total_price    │   └─────────────────┘       │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record is identified by a UUID v4 string. Quantities, prices and
//! fractions are [`Money`] (fixed-point hundredths).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Payment Type
// =============================================================================

/// How a munji purchase was paid.
///
/// Stored as lowercase text (`cash`, `credit`); shown to clients as
/// `Cash` / `Credit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum PaymentType {
    /// Paid from cash in hand at the time of purchase.
    Cash,
    /// Owed to the supplier; no cash moves.
    Credit,
}

impl PaymentType {
    pub const ALL: [PaymentType; 2] = [PaymentType::Cash, PaymentType::Credit];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Credit => "Credit",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentType::Cash),
            "credit" => Ok(PaymentType::Credit),
            _ => Err(ValidationError::InvalidFormat {
                field: "payment_type".to_string(),
                reason: format!("'{s}' is not one of Cash, Credit"),
            }),
        }
    }
}

/// One entry of the payment-choice list served to forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentChoice {
    pub value: &'static str,
    pub label: &'static str,
}

/// The payment types a purchase may use.
pub fn payment_choices() -> Vec<PaymentChoice> {
    PaymentType::ALL
        .iter()
        .map(|p| PaymentChoice {
            value: p.label(),
            label: p.label(),
        })
        .collect()
}

// =============================================================================
// Catalog
// =============================================================================

/// A munji supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    /// Unique, trimmed, at most 255 characters.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A munji category (variety or grade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    /// Unique, trimmed, at most 255 characters.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// A munji purchase.
///
/// `total_price` is always `round2(quantity × unit_price)`, computed by the
/// server. `total_cost` starts equal to `total_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,
    pub supplier_id: String,
    pub category_id: String,
    pub total_bags: i64,
    /// Munji weight.
    pub quantity: Money,
    pub unit_price: Money,
    pub total_price: Money,
    pub total_cost: Money,
    pub payment_type: PaymentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Expense
// =============================================================================

/// An expense charged against a purchase (transport, labour, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub purchase_id: String,
    pub title: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Production
// =============================================================================

/// A rice production run that consumed munji from inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Production {
    pub id: String,
    /// Munji consumed.
    pub quantity_produced: Money,
    pub dryer_cost: Money,
    pub factory_cost: Money,
    /// Fraction in `[0, 1]`.
    pub wastage: Money,
    /// Rice yield fraction in `[0, 1]`.
    pub quality_of_rice: Money,
    pub unit_price: Money,
    /// `round2(quantity_produced × quality_of_rice)`.
    pub total_quality: Money,
    /// `round2(total_quality × unit_price)`.
    pub total_price: Money,
    /// Price of the by-product ("naku").
    pub naku_price: Money,
    pub naku_quantity: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Miscellaneous Cost
// =============================================================================

/// A cost not tied to any purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MiscellaneousCost {
    pub id: String,
    pub title: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
