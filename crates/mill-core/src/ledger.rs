//! # Ledger
//!
//! The mill's single financial/inventory state record: capital, cash in
//! hand, cumulative sales and the running munji stock.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ledger Operations                              │
//! │                                                                         │
//! │  add_capital(a)            capital += a                                 │
//! │  move_capital_to_cash(a)   capital -= a, cash_in_hand += a              │
//! │  record_purchase(c, q)     cash_in_hand -= c, munji_inventory += q      │
//! │  record_credit_purchase(q) munji_inventory += q                         │
//! │  record_expense(a)         cash_in_hand -= a                            │
//! │  record_miscellaneous(a)   cash_in_hand -= a                            │
//! │  record_sale(a)            sales += a                                   │
//! │  consume_inventory(q)      munji_inventory -= q                         │
//! │  receive_inventory(q)      munji_inventory += q                         │
//! │                                                                         │
//! │  Invariant: capital, cash_in_hand, munji_inventory never below zero     │
//! │  Every amount and balance stays at or below 9 999 999 999.99            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation checks its preconditions first and mutates only on
//! success, so a rejected call leaves every field untouched. Composite
//! operations ([`Ledger::revise_purchase`], [`Ledger::apply_adjustment`])
//! run against a working copy that replaces `self` only when all steps pass.
//!
//! The fields are private: the only way to change a ledger is through these
//! methods. Persistence (get-or-create of row id 1, save) lives in `mill-db`.

use serde::{Deserialize, Serialize};

use crate::error::{Account, CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentType, Purchase};
use crate::validation::{bounded_difference, bounded_sum, validate_max_amount, validate_non_negative};

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ledger {
    capital: Money,
    cash_in_hand: Money,
    sales: Money,
    munji_inventory: Money,
}

impl Ledger {
    /// An empty ledger, the state of a freshly created row.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capital(&self) -> Money {
        self.capital
    }

    pub fn cash_in_hand(&self) -> Money {
        self.cash_in_hand
    }

    pub fn sales(&self) -> Money {
        self.sales
    }

    pub fn munji_inventory(&self) -> Money {
        self.munji_inventory
    }

    /// `capital += amount`.
    pub fn add_capital(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("capital", amount)?;
        self.capital = bounded_sum("capital", self.capital, amount)?;
        Ok(())
    }

    /// Moves funds from capital into cash in hand.
    pub fn move_capital_to_cash(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("cash_in_hand", amount)?;
        self.require_funds(Account::Capital, amount)?;
        let capital = bounded_difference("capital", self.capital, amount)?;
        let cash_in_hand = bounded_sum("cash_in_hand", self.cash_in_hand, amount)?;
        self.capital = capital;
        self.cash_in_hand = cash_in_hand;
        Ok(())
    }

    /// Pays `cash_amount` out of cash in hand and adds `munji_qty` to stock.
    pub fn record_purchase(&mut self, cash_amount: Money, munji_qty: Money) -> CoreResult<()> {
        validate_non_negative("total_price", cash_amount)?;
        validate_non_negative("quantity", munji_qty)?;
        self.require_funds(Account::CashInHand, cash_amount)?;
        let cash_in_hand = bounded_difference("cash_in_hand", self.cash_in_hand, cash_amount)?;
        let munji_inventory = bounded_sum("munji_inventory", self.munji_inventory, munji_qty)?;
        self.cash_in_hand = cash_in_hand;
        self.munji_inventory = munji_inventory;
        Ok(())
    }

    /// Credit purchases add stock without touching cash.
    pub fn record_credit_purchase(&mut self, munji_qty: Money) -> CoreResult<()> {
        validate_non_negative("quantity", munji_qty)?;
        self.munji_inventory = bounded_sum("munji_inventory", self.munji_inventory, munji_qty)?;
        Ok(())
    }

    pub fn record_expense(&mut self, amount: Money) -> CoreResult<()> {
        self.pay_out(amount)
    }

    pub fn record_miscellaneous(&mut self, amount: Money) -> CoreResult<()> {
        self.pay_out(amount)
    }

    /// `sales += amount`.
    pub fn record_sale(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("sales", amount)?;
        self.sales = bounded_sum("sales", self.sales, amount)?;
        Ok(())
    }

    /// Takes `qty` munji out of stock (production runs).
    pub fn consume_inventory(&mut self, qty: Money) -> CoreResult<()> {
        validate_non_negative("quantity_produced", qty)?;
        self.require_inventory(qty)?;
        self.munji_inventory = bounded_difference("munji_inventory", self.munji_inventory, qty)?;
        Ok(())
    }

    /// Adds stock that did not come through a purchase (opening stock).
    pub fn receive_inventory(&mut self, qty: Money) -> CoreResult<()> {
        validate_non_negative("munji_inventory", qty)?;
        self.munji_inventory = bounded_sum("munji_inventory", self.munji_inventory, qty)?;
        Ok(())
    }

    /// Applies the effect of a new purchase.
    pub fn apply_purchase(&mut self, effect: PurchaseEffect) -> CoreResult<()> {
        match effect.payment_type {
            PaymentType::Cash => self.record_purchase(effect.cash, effect.munji),
            PaymentType::Credit => self.record_credit_purchase(effect.munji),
        }
    }

    /// Replaces the effect of an edited purchase: `old` is reversed and
    /// `new` applied. Fails with `InsufficientInventory` when the stock the
    /// old purchase added has already been consumed, and with
    /// `InsufficientFunds` when the new cash total is not covered.
    pub fn revise_purchase(&mut self, old: PurchaseEffect, new: PurchaseEffect) -> CoreResult<()> {
        self.transact(|ledger| {
            ledger.require_inventory(old.munji)?;
            ledger.munji_inventory =
                bounded_difference("munji_inventory", ledger.munji_inventory, old.munji)?;
            ledger.cash_in_hand = bounded_sum("cash_in_hand", ledger.cash_in_hand, old.cash)?;
            ledger.apply_purchase(new)
        })
    }

    /// Applies an operator adjustment as one all-or-nothing step.
    ///
    /// Order: capital, capital→cash, sales, inventory.
    pub fn apply_adjustment(&mut self, adjustment: &LedgerAdjustment) -> CoreResult<()> {
        self.transact(|ledger| {
            if let Some(delta) = adjustment.inventory_delta {
                validate_max_amount("inventory_delta", delta)?;
            }
            if let Some(amount) = adjustment.capital_delta {
                ledger.add_capital(amount)?;
            }
            if let Some(amount) = adjustment.cash_delta {
                ledger.move_capital_to_cash(amount)?;
            }
            if let Some(amount) = adjustment.sales_delta {
                ledger.record_sale(amount)?;
            }
            if let Some(delta) = adjustment.inventory_delta {
                if delta.is_negative() {
                    ledger.consume_inventory(delta.abs())?;
                } else {
                    ledger.receive_inventory(delta)?;
                }
            }
            Ok(())
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn pay_out(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("amount", amount)?;
        self.require_funds(Account::CashInHand, amount)?;
        self.cash_in_hand = bounded_difference("cash_in_hand", self.cash_in_hand, amount)?;
        Ok(())
    }

    fn require_funds(&self, account: Account, requested: Money) -> CoreResult<()> {
        let available = match account {
            Account::Capital => self.capital,
            Account::CashInHand => self.cash_in_hand,
        };
        if available < requested {
            return Err(CoreError::InsufficientFunds {
                account,
                available,
                requested,
            });
        }
        Ok(())
    }

    fn require_inventory(&self, requested: Money) -> CoreResult<()> {
        if self.munji_inventory < requested {
            return Err(CoreError::InsufficientInventory {
                available: self.munji_inventory,
                requested,
            });
        }
        Ok(())
    }

    fn transact(&mut self, f: impl FnOnce(&mut Ledger) -> CoreResult<()>) -> CoreResult<()> {
        let mut working = self.clone();
        f(&mut working)?;
        *self = working;
        Ok(())
    }
}

// =============================================================================
// Purchase Effect
// =============================================================================

/// What a purchase does to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseEffect {
    pub payment_type: PaymentType,
    /// Cash paid out; zero for credit purchases.
    pub cash: Money,
    /// Munji added to stock.
    pub munji: Money,
}

impl PurchaseEffect {
    pub fn new(payment_type: PaymentType, total_price: Money, quantity: Money) -> Self {
        let cash = match payment_type {
            PaymentType::Cash => total_price,
            PaymentType::Credit => Money::zero(),
        };
        PurchaseEffect {
            payment_type,
            cash,
            munji: quantity,
        }
    }

    pub fn of(purchase: &Purchase) -> Self {
        Self::new(purchase.payment_type, purchase.total_price, purchase.quantity)
    }
}

// =============================================================================
// Ledger Adjustment
// =============================================================================

/// Operator-driven changes to the ledger (`PATCH /api/globals`).
///
/// - `capital_delta` (≥ 0) is added to capital
/// - `cash_delta` (≥ 0) is moved from capital to cash in hand
/// - `sales_delta` (≥ 0) is added to sales
/// - `inventory_delta` adds stock when positive, consumes it when negative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAdjustment {
    #[serde(default)]
    pub capital_delta: Option<Money>,
    #[serde(default)]
    pub cash_delta: Option<Money>,
    #[serde(default)]
    pub sales_delta: Option<Money>,
    #[serde(default)]
    pub inventory_delta: Option<Money>,
}

impl LedgerAdjustment {
    pub fn is_empty(&self) -> bool {
        self.capital_delta.is_none()
            && self.cash_delta.is_none()
            && self.sales_delta.is_none()
            && self.inventory_delta.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    /// {capital: 1000.00, cash_in_hand: 500.00, munji_inventory: 0}
    fn opening_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_capital(m("1500.00")).unwrap();
        ledger.move_capital_to_cash(m("500.00")).unwrap();
        ledger
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.capital().is_zero());
        assert!(ledger.cash_in_hand().is_zero());
        assert!(ledger.sales().is_zero());
        assert!(ledger.munji_inventory().is_zero());
    }

    #[test]
    fn test_move_capital_to_cash() {
        let mut ledger = opening_ledger();
        ledger.move_capital_to_cash(m("300.00")).unwrap();
        assert_eq!(ledger.capital(), m("700.00"));
        assert_eq!(ledger.cash_in_hand(), m("800.00"));
    }

    #[test]
    fn test_move_more_than_capital_is_rejected_without_change() {
        let mut ledger = opening_ledger();
        let before = ledger.clone();

        let err = ledger.move_capital_to_cash(m("1000.01")).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientFunds {
                account: Account::Capital,
                available: m("1000.00"),
                requested: m("1000.01"),
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let mut ledger = opening_ledger();
        let before = ledger.clone();

        assert_eq!(
            ledger.add_capital(m("-1")).unwrap_err().kind(),
            ErrorKind::ValidationFailed
        );
        assert!(ledger.move_capital_to_cash(m("-1")).is_err());
        assert!(ledger.record_sale(m("-1")).is_err());
        assert!(ledger.record_expense(m("-1")).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_cash_purchase_moves_cash_into_stock() {
        let mut ledger = opening_ledger();
        ledger.record_purchase(m("500.00"), m("10")).unwrap();
        assert_eq!(ledger.cash_in_hand(), m("0.00"));
        assert_eq!(ledger.munji_inventory(), m("10.00"));
    }

    #[test]
    fn test_cash_purchase_over_cash_is_rejected_without_change() {
        let mut ledger = opening_ledger();
        let before = ledger.clone();

        let err = ledger.record_purchase(m("500.01"), m("10")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_credit_purchase_only_adds_stock() {
        let mut ledger = opening_ledger();
        let effect = PurchaseEffect::new(PaymentType::Credit, m("99999.00"), m("25.50"));
        ledger.apply_purchase(effect).unwrap();
        assert_eq!(ledger.cash_in_hand(), m("500.00"));
        assert_eq!(ledger.munji_inventory(), m("25.50"));
    }

    #[test]
    fn test_expense_and_miscellaneous_draw_cash() {
        let mut ledger = opening_ledger();
        ledger.record_expense(m("120.25")).unwrap();
        ledger.record_miscellaneous(m("79.75")).unwrap();
        assert_eq!(ledger.cash_in_hand(), m("300.00"));

        let before = ledger.clone();
        let err = ledger.record_expense(m("300.01")).unwrap_err();
        assert_eq!(err.field(), "cash_in_hand");
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_consume_inventory() {
        let mut ledger = opening_ledger();
        ledger.record_credit_purchase(m("10")).unwrap();
        ledger.consume_inventory(m("8")).unwrap();
        assert_eq!(ledger.munji_inventory(), m("2.00"));

        let err = ledger.consume_inventory(m("5")).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientInventory {
                available: m("2.00"),
                requested: m("5.00"),
            }
        );
        assert_eq!(ledger.munji_inventory(), m("2.00"));
    }

    #[test]
    fn test_scenario_walkthrough() {
        let mut ledger = opening_ledger();

        ledger.move_capital_to_cash(m("300.00")).unwrap();
        assert_eq!(ledger.capital(), m("700.00"));
        assert_eq!(ledger.cash_in_hand(), m("800.00"));

        let total = m("10").multiply(m("50.00")).unwrap();
        ledger
            .apply_purchase(PurchaseEffect::new(PaymentType::Cash, total, m("10")))
            .unwrap();
        assert_eq!(ledger.cash_in_hand(), m("300.00"));
        assert_eq!(ledger.munji_inventory(), m("10.00"));

        ledger.consume_inventory(m("8")).unwrap();
        assert_eq!(ledger.munji_inventory(), m("2.00"));

        let err = ledger.consume_inventory(m("5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientInventory);
        assert_eq!(ledger.munji_inventory(), m("2.00"));
    }

    #[test]
    fn test_revise_purchase_swaps_effects() {
        let mut ledger = opening_ledger();
        let old = PurchaseEffect::new(PaymentType::Cash, m("200.00"), m("4"));
        ledger.apply_purchase(old).unwrap();

        // 300 left + 200 refunded - 450 paid
        let new = PurchaseEffect::new(PaymentType::Cash, m("450.00"), m("9"));
        ledger.revise_purchase(old, new).unwrap();

        assert_eq!(ledger.cash_in_hand(), m("50.00"));
        assert_eq!(ledger.munji_inventory(), m("9.00"));
    }

    #[test]
    fn test_revise_purchase_cash_to_credit_refunds_cash() {
        let mut ledger = opening_ledger();
        let old = PurchaseEffect::new(PaymentType::Cash, m("200.00"), m("4"));
        ledger.apply_purchase(old).unwrap();

        let new = PurchaseEffect::new(PaymentType::Credit, m("200.00"), m("4"));
        ledger.revise_purchase(old, new).unwrap();

        assert_eq!(ledger.cash_in_hand(), m("500.00"));
        assert_eq!(ledger.munji_inventory(), m("4.00"));
    }

    #[test]
    fn test_revise_purchase_rejects_when_stock_was_consumed() {
        let mut ledger = opening_ledger();
        let old = PurchaseEffect::new(PaymentType::Credit, m("0"), m("10"));
        ledger.apply_purchase(old).unwrap();
        ledger.consume_inventory(m("8")).unwrap();
        let before = ledger.clone();

        let new = PurchaseEffect::new(PaymentType::Credit, m("0"), m("1"));
        let err = ledger.revise_purchase(old, new).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientInventory);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_revise_purchase_rejects_unfunded_total() {
        let mut ledger = opening_ledger();
        let old = PurchaseEffect::new(PaymentType::Cash, m("100.00"), m("2"));
        ledger.apply_purchase(old).unwrap();
        let before = ledger.clone();

        // 400 left + 100 refunded = 500 available
        let new = PurchaseEffect::new(PaymentType::Cash, m("500.01"), m("2"));
        let err = ledger.revise_purchase(old, new).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_adjustment_is_all_or_nothing() {
        let mut ledger = opening_ledger();
        let before = ledger.clone();

        let adjustment = LedgerAdjustment {
            capital_delta: Some(m("100.00")),
            cash_delta: Some(m("5000.00")),
            ..Default::default()
        };
        let err = ledger.apply_adjustment(&adjustment).unwrap_err();
        assert_eq!(err.field(), "capital");
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_adjustment_applies_every_delta() {
        let mut ledger = opening_ledger();
        let adjustment = LedgerAdjustment {
            capital_delta: Some(m("250.00")),
            cash_delta: Some(m("300.00")),
            sales_delta: Some(m("75.50")),
            inventory_delta: Some(m("12.00")),
        };
        ledger.apply_adjustment(&adjustment).unwrap();

        assert_eq!(ledger.capital(), m("950.00"));
        assert_eq!(ledger.cash_in_hand(), m("800.00"));
        assert_eq!(ledger.sales(), m("75.50"));
        assert_eq!(ledger.munji_inventory(), m("12.00"));

        let consume = LedgerAdjustment {
            inventory_delta: Some(m("-2.00")),
            ..Default::default()
        };
        ledger.apply_adjustment(&consume).unwrap();
        assert_eq!(ledger.munji_inventory(), m("10.00"));
        assert!(!consume.is_empty());
        assert!(LedgerAdjustment::default().is_empty());
    }

    fn is_out_of_range(err: &CoreError, expected_field: &str) -> bool {
        matches!(
            err,
            CoreError::Validation(crate::error::ValidationError::OutOfRange { field, .. })
                if field == expected_field
        )
    }

    #[test]
    fn test_capital_beyond_maximum_is_rejected_without_change() {
        let mut ledger = Ledger::new();
        ledger.add_capital(Money::MAX).unwrap();
        let before = ledger.clone();

        let err = ledger.add_capital(m("1.00")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(is_out_of_range(&err, "capital"));
        assert_eq!(ledger, before);

        // An amount past i64 hundredths never reaches the balance
        let err = ledger.add_capital(m("92233720368547758.07")).unwrap_err();
        assert!(is_out_of_range(&err, "capital"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_stock_and_sales_beyond_maximum_are_rejected() {
        let mut ledger = Ledger::new();
        ledger.record_credit_purchase(Money::MAX).unwrap();
        ledger.record_sale(Money::MAX).unwrap();
        let before = ledger.clone();

        assert!(is_out_of_range(
            &ledger.record_credit_purchase(m("0.01")).unwrap_err(),
            "munji_inventory"
        ));
        assert!(is_out_of_range(
            &ledger.receive_inventory(m("0.01")).unwrap_err(),
            "munji_inventory"
        ));
        assert!(is_out_of_range(&ledger.record_sale(m("0.01")).unwrap_err(), "sales"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_cash_beyond_maximum_is_rejected_without_change() {
        let mut ledger = Ledger::new();
        ledger.add_capital(Money::MAX).unwrap();
        ledger.move_capital_to_cash(Money::MAX).unwrap();
        ledger.add_capital(m("1.00")).unwrap();
        let before = ledger.clone();

        let err = ledger.move_capital_to_cash(m("1.00")).unwrap_err();
        assert!(is_out_of_range(&err, "cash_in_hand"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_revise_purchase_refund_beyond_maximum_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.add_capital(Money::MAX).unwrap();
        ledger.move_capital_to_cash(Money::MAX).unwrap();
        ledger.record_purchase(m("100.00"), m("10")).unwrap();
        ledger.add_capital(m("100.00")).unwrap();
        ledger.move_capital_to_cash(m("100.00")).unwrap();
        let before = ledger.clone();

        // Refunding the old 100.00 would lift cash past the maximum
        let old = PurchaseEffect::new(PaymentType::Cash, m("100.00"), m("10"));
        let new = PurchaseEffect::new(PaymentType::Credit, m("100.00"), m("10"));
        let err = ledger.revise_purchase(old, new).unwrap_err();
        assert!(is_out_of_range(&err, "cash_in_hand"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_oversized_adjustment_changes_nothing() {
        let mut ledger = opening_ledger();
        let before = ledger.clone();

        let adjustment = LedgerAdjustment {
            sales_delta: Some(m("10.00")),
            capital_delta: Some(m("10000000000.00")),
            ..Default::default()
        };
        let err = ledger.apply_adjustment(&adjustment).unwrap_err();
        assert!(is_out_of_range(&err, "capital"));
        assert_eq!(ledger, before);

        let adjustment = LedgerAdjustment {
            inventory_delta: Some(m("-10000000000.00")),
            ..Default::default()
        };
        let err = ledger.apply_adjustment(&adjustment).unwrap_err();
        assert!(is_out_of_range(&err, "inventory_delta"));
        assert_eq!(ledger, before);
    }
}
