//! # Production Rules
//!
//! Validation and derived totals for rice production runs.
//!
//! ```text
//! total_quality = round2(quantity_produced × quality_of_rice)
//! total_price   = round2(total_quality × unit_price)
//! ```
//!
//! Unlike purchases, a production request that carries its own totals must
//! agree with the recomputation; a disagreement is a validation failure.
//! Omitted totals are filled in.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{
    bounded_product, validate_fraction, validate_matches, validate_non_negative, validate_positive,
};

/// Request body for recording a production run.
///
/// `unit_price` may be zero: a run can be recorded before its rice is
/// priced, unlike a purchase, which needs a positive price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduction {
    pub quantity_produced: Money,
    #[serde(default)]
    pub dryer_cost: Money,
    #[serde(default)]
    pub factory_cost: Money,
    #[serde(default)]
    pub wastage: Money,
    pub quality_of_rice: Money,
    pub unit_price: Money,
    #[serde(default)]
    pub total_quality: Option<Money>,
    #[serde(default)]
    pub total_price: Option<Money>,
    #[serde(default)]
    pub naku_price: Money,
    #[serde(default)]
    pub naku_quantity: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionTotals {
    pub total_quality: Money,
    pub total_price: Money,
}

impl ProductionTotals {
    pub fn compute(
        quantity_produced: Money,
        quality_of_rice: Money,
        unit_price: Money,
    ) -> CoreResult<Self> {
        let total_quality = bounded_product("total_quality", quantity_produced, quality_of_rice)?;
        Ok(ProductionTotals {
            total_quality,
            total_price: bounded_product("total_price", total_quality, unit_price)?,
        })
    }
}

impl NewProduction {
    /// Checks field rules and supplied totals; returns the recomputed totals.
    pub fn validate(&self) -> CoreResult<ProductionTotals> {
        validate_positive("quantity_produced", self.quantity_produced)?;
        validate_non_negative("dryer_cost", self.dryer_cost)?;
        validate_non_negative("factory_cost", self.factory_cost)?;
        validate_fraction("wastage", self.wastage)?;
        validate_fraction("quality_of_rice", self.quality_of_rice)?;
        validate_non_negative("unit_price", self.unit_price)?;
        validate_non_negative("naku_price", self.naku_price)?;
        validate_non_negative("naku_quantity", self.naku_quantity)?;

        let totals =
            ProductionTotals::compute(self.quantity_produced, self.quality_of_rice, self.unit_price)?;
        validate_matches("total_quality", self.total_quality, totals.total_quality)?;
        validate_matches("total_price", self.total_price, totals.total_price)?;

        Ok(totals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorKind, ValidationError};

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn request() -> NewProduction {
        NewProduction {
            quantity_produced: m("8"),
            dryer_cost: m("40.00"),
            factory_cost: m("25.00"),
            wastage: m("0.05"),
            quality_of_rice: m("0.65"),
            unit_price: m("120.00"),
            total_quality: None,
            total_price: None,
            naku_price: m("10.00"),
            naku_quantity: m("1.50"),
        }
    }

    #[test]
    fn test_totals_are_derived() {
        let totals = request().validate().unwrap();
        assert_eq!(totals.total_quality, m("5.20"));
        assert_eq!(totals.total_price, m("624.00"));
    }

    #[test]
    fn test_matching_totals_are_accepted() {
        let mut req = request();
        req.total_quality = Some(m("5.20"));
        req.total_price = Some(m("624.00"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_mismatched_total_is_rejected() {
        let mut req = request();
        req.total_price = Some(m("600.00"));
        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(
            err,
            ValidationError::Mismatch {
                field: "total_price".to_string(),
                supplied: m("600.00"),
                expected: m("624.00"),
            }
            .into()
        );
    }

    #[test]
    fn test_total_quality_rounds_before_pricing() {
        let mut req = request();
        req.quantity_produced = m("3.33");
        req.quality_of_rice = m("0.33");
        req.unit_price = m("10.00");
        // 3.33 × 0.33 = 1.0989 → 1.10; 1.10 × 10 = 11.00
        let totals = req.validate().unwrap();
        assert_eq!(totals.total_quality, m("1.10"));
        assert_eq!(totals.total_price, m("11.00"));
    }

    #[test]
    fn test_fractions_must_be_within_unit_range() {
        let mut req = request();
        req.wastage = m("1.01");
        assert_eq!(req.validate().unwrap_err().field(), "wastage");

        let mut req = request();
        req.quality_of_rice = m("-0.10");
        assert_eq!(req.validate().unwrap_err().field(), "quality_of_rice");
    }

    #[test]
    fn test_zero_unit_price_records_unpriced_run() {
        let mut req = request();
        req.unit_price = Money::zero();
        let totals = req.validate().unwrap();
        assert_eq!(totals.total_quality, m("5.20"));
        assert!(totals.total_price.is_zero());

        req.unit_price = m("-0.01");
        assert_eq!(req.validate().unwrap_err().field(), "unit_price");
    }

    #[test]
    fn test_oversized_total_price_is_rejected() {
        let mut req = request();
        req.quantity_produced = m("9999999999.99");
        req.quality_of_rice = Money::one();
        req.unit_price = m("2.00");
        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "total_price"
        ));
    }

    #[test]
    fn test_rejects_non_positive_quantity_and_negative_costs() {
        let mut req = request();
        req.quantity_produced = Money::zero();
        assert_eq!(req.validate().unwrap_err().field(), "quantity_produced");

        let mut req = request();
        req.dryer_cost = m("-1");
        assert_eq!(req.validate().unwrap_err().field(), "dryer_cost");
    }
}
