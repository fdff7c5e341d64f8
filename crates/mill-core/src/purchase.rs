//! # Purchase Rules
//!
//! Validation and derived totals for munji purchases.
//!
//! ## Create / Update Flow
//! ```text
//! NewPurchase (client)
//!      │
//!      ▼
//! validate()  ── bags > 0, 0 < quantity, unit_price ≤ 9 999 999 999.99, UUID ids
//!      │
//!      ▼
//! PurchaseTotals::compute(quantity, unit_price)
//!      │         total_price = round2(quantity × unit_price)
//!      │         total_cost  = total_price
//!      ▼
//! PurchaseEffect ──► Ledger::apply_purchase / Ledger::revise_purchase
//! ```
//!
//! A `total_price` sent by the client is never trusted: it is replaced by the
//! recomputation. See [`NewPurchase::overrides_total`].

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::ledger::PurchaseEffect;
use crate::money::Money;
use crate::types::PaymentType;
use crate::validation::{bounded_product, validate_bag_count, validate_positive, validate_uuid};

/// Request body for creating or replacing a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub supplier_id: String,
    pub category_id: String,
    pub total_bags: i64,
    pub quantity: Money,
    pub unit_price: Money,
    /// Ignored; recomputed from quantity and unit price.
    #[serde(default)]
    pub total_price: Option<Money>,
    pub payment_type: PaymentType,
}

/// Server-computed totals of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTotals {
    pub total_price: Money,
    pub total_cost: Money,
}

impl PurchaseTotals {
    /// Fails with `OutOfRange` when the product exceeds [`Money::MAX`].
    pub fn compute(quantity: Money, unit_price: Money) -> CoreResult<Self> {
        let total_price = bounded_product("total_price", quantity, unit_price)?;
        Ok(PurchaseTotals {
            total_price,
            total_cost: total_price,
        })
    }
}

impl NewPurchase {
    /// Checks field rules and returns the recomputed totals.
    pub fn validate(&self) -> CoreResult<PurchaseTotals> {
        validate_uuid("supplier_id", &self.supplier_id)?;
        validate_uuid("category_id", &self.category_id)?;
        validate_bag_count(self.total_bags)?;
        validate_positive("quantity", self.quantity)?;
        validate_positive("unit_price", self.unit_price)?;

        PurchaseTotals::compute(self.quantity, self.unit_price)
    }

    /// True when the client sent a total that differs from `totals`.
    pub fn overrides_total(&self, totals: &PurchaseTotals) -> bool {
        self.total_price
            .is_some_and(|supplied| supplied != totals.total_price)
    }

    /// The ledger effect of this purchase once totals are known.
    pub fn effect(&self, totals: &PurchaseTotals) -> PurchaseEffect {
        PurchaseEffect::new(self.payment_type, totals.total_price, self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    const SUPPLIER: &str = "550e8400-e29b-41d4-a716-446655440000";
    const CATEGORY: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    fn request() -> NewPurchase {
        NewPurchase {
            supplier_id: SUPPLIER.to_string(),
            category_id: CATEGORY.to_string(),
            total_bags: 4,
            quantity: "10".parse().unwrap(),
            unit_price: "52.00".parse().unwrap(),
            total_price: None,
            payment_type: PaymentType::Cash,
        }
    }

    #[test]
    fn test_totals_are_recomputed() {
        let totals = request().validate().unwrap();
        assert_eq!(totals.total_price, Money::from_major(520));
        assert_eq!(totals.total_cost, totals.total_price);
    }

    #[test]
    fn test_totals_round_to_hundredths() {
        let mut req = request();
        req.quantity = "2.55".parse().unwrap();
        req.unit_price = "3.33".parse().unwrap();
        // 2.55 × 3.33 = 8.4915
        assert_eq!(req.validate().unwrap().total_price, "8.49".parse().unwrap());
    }

    #[test]
    fn test_supplied_total_is_overridden() {
        let mut req = request();
        req.total_price = Some(Money::from_major(1));
        let totals = req.validate().unwrap();
        assert!(req.overrides_total(&totals));
        assert_eq!(totals.total_price, Money::from_major(520));

        req.total_price = Some(Money::from_major(520));
        assert!(!req.overrides_total(&totals));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut req = request();
        req.total_bags = 0;
        assert_eq!(req.validate().unwrap_err().field(), "total_bags");

        let mut req = request();
        req.quantity = Money::zero();
        assert_eq!(
            req.validate().unwrap_err(),
            CoreError::Validation(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );

        let mut req = request();
        req.unit_price = Money::zero();
        assert_eq!(req.validate().unwrap_err().field(), "unit_price");

        let mut req = request();
        req.supplier_id = "acme".to_string();
        assert_eq!(req.validate().unwrap_err().field(), "supplier_id");
    }

    #[test]
    fn test_oversized_total_is_rejected() {
        // Both factors are within range; their product is not
        let mut req = request();
        req.quantity = "9999999999.99".parse().unwrap();
        req.unit_price = "100".parse().unwrap();
        assert_eq!(
            req.validate().unwrap_err(),
            CoreError::Validation(ValidationError::OutOfRange {
                field: "total_price".to_string(),
                min: "-9999999999.99".to_string(),
                max: "9999999999.99".to_string(),
            })
        );

        // Beyond i64 hundredths entirely
        assert!(PurchaseTotals::compute(
            "92233720368547758".parse().unwrap(),
            "100".parse().unwrap()
        )
        .is_err());

        let mut req = request();
        req.quantity = "10000000000".parse().unwrap();
        assert_eq!(req.validate().unwrap_err().field(), "quantity");
    }

    #[test]
    fn test_effect_depends_on_payment_type() {
        let mut req = request();
        let totals = req.validate().unwrap();
        assert_eq!(req.effect(&totals).cash, Money::from_major(520));

        req.payment_type = PaymentType::Credit;
        let effect = req.effect(&totals);
        assert!(effect.cash.is_zero());
        assert_eq!(effect.munji, Money::from_major(10));
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let req: NewPurchase = serde_json::from_value(serde_json::json!({
            "supplier_id": SUPPLIER,
            "category_id": CATEGORY,
            "total_bags": 4,
            "quantity": 10,
            "unit_price": "52.00",
            "payment_type": "Credit"
        }))
        .unwrap();
        assert_eq!(req.quantity, Money::from_major(10));
        assert_eq!(req.payment_type, PaymentType::Credit);
        assert!(req.total_price.is_none());
    }
}
