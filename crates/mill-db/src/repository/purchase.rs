//! # Purchase Repository
//!
//! Munji purchases and their effect on the ledger.
//!
//! ## Recording a Purchase
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(NewPurchase)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate + recompute total_price      (no I/O yet)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─► lock_ledger ─► supplier/category exist?                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cash:   ledger.record_purchase(total_price, quantity)                 │
//! │  Credit: ledger.record_credit_purchase(quantity)                       │
//! │       │                    │                                            │
//! │       │                    └── InsufficientFunds → ROLLBACK            │
//! │       ▼                                                                 │
//! │  INSERT munji_purchases ─► save_ledger ─► COMMIT                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Updates reverse the stored purchase's effect and apply the new one in the
//! same kind of transaction. Deletes remove the row (and, by cascade, its
//! expenses) without touching the ledger.

use chrono::Utc;
use mill_core::{
    Category, NewPurchase, Page, PageRequest, Purchase, PurchaseEffect, PurchaseFilter, Supplier,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::catalog::ensure_exists;
use crate::repository::ledger::{lock_ledger, save_ledger};
use crate::repository::{new_id, rejected};

const COLUMNS: &str = "id, supplier_id, category_id, total_bags, quantity, unit_price, \
                       total_price, total_cost, payment_type, created_at, updated_at";

/// Repository for munji purchases.
///
/// ## Usage
/// ```rust,ignore
/// let purchase = db.purchases().create(&request).await?;
/// let page = db.purchases().list(&filter, PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Records a purchase and its ledger effect atomically.
    ///
    /// ## Returns
    /// * `Ok(Purchase)` - stored with server-computed totals
    /// * `Err(DbError::Rejected(..))` - validation, unknown reference or
    ///   insufficient cash; nothing was written
    pub async fn create(&self, request: &NewPurchase) -> DbResult<Purchase> {
        let totals = request
            .validate()
            .map_err(|e| rejected("create_purchase", e))?;

        if request.overrides_total(&totals) {
            debug!(
                supplied = ?request.total_price,
                computed = %totals.total_price,
                "Client total_price replaced by recomputation"
            );
        }

        let id = new_id();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        ensure_exists::<Supplier>(&mut tx, &request.supplier_id).await?;
        ensure_exists::<Category>(&mut tx, &request.category_id).await?;

        ledger
            .apply_purchase(request.effect(&totals))
            .map_err(|e| rejected("create_purchase", e))?;

        debug!(
            id = %id,
            payment_type = %request.payment_type,
            quantity = %request.quantity,
            total_price = %totals.total_price,
            "Inserting purchase"
        );

        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            INSERT INTO munji_purchases (
                id, supplier_id, category_id, total_bags, quantity, unit_price,
                total_price, total_cost, payment_type, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(&request.supplier_id)
        .bind(&request.category_id)
        .bind(request.total_bags)
        .bind(request.quantity)
        .bind(request.unit_price)
        .bind(totals.total_price)
        .bind(totals.total_cost)
        .bind(request.payment_type)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        info!(id = %purchase.id, "Purchase recorded");
        Ok(purchase)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {COLUMNS} FROM munji_purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Filtered, newest-first page of purchases.
    pub async fn list(&self, filter: &PurchaseFilter, page: PageRequest) -> DbResult<Page<Purchase>> {
        filter.validate()?;
        let page = page.normalized();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM munji_purchases");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM munji_purchases"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let data = select
            .build_query_as::<Purchase>()
            .fetch_all(&self.pool)
            .await?;

        debug!(total, returned = data.len(), page = page.page, "Listed purchases");
        Ok(Page::new(data, page, u64::try_from(total).unwrap_or_default()))
    }

    /// Replaces a purchase and revises the ledger in one transaction.
    ///
    /// The stored purchase's effect is reversed (cash refunded for Cash,
    /// its quantity taken back out of inventory) and the new effect applied.
    /// Fails with `InsufficientInventory` when that stock has already been
    /// milled, or `InsufficientFunds` when the new cash total is not covered.
    pub async fn update(&self, id: &str, request: &NewPurchase) -> DbResult<Purchase> {
        let totals = request
            .validate()
            .map_err(|e| rejected("update_purchase", e))?;

        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        let existing = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {COLUMNS} FROM munji_purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Purchase", id))?;

        ensure_exists::<Supplier>(&mut tx, &request.supplier_id).await?;
        ensure_exists::<Category>(&mut tx, &request.category_id).await?;

        ledger
            .revise_purchase(PurchaseEffect::of(&existing), request.effect(&totals))
            .map_err(|e| rejected("update_purchase", e))?;

        debug!(id = %id, total_price = %totals.total_price, "Updating purchase");

        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            UPDATE munji_purchases
            SET supplier_id = ?1, category_id = ?2, total_bags = ?3, quantity = ?4,
                unit_price = ?5, total_price = ?6, total_cost = ?7, payment_type = ?8,
                updated_at = ?9
            WHERE id = ?10
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&request.supplier_id)
        .bind(&request.category_id)
        .bind(request.total_bags)
        .bind(request.quantity)
        .bind(request.unit_price)
        .bind(totals.total_price)
        .bind(totals.total_cost)
        .bind(request.payment_type)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        info!(id = %id, "Purchase updated");
        Ok(purchase)
    }

    /// Deletes a purchase and its expenses. The ledger is left as is.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM munji_purchases WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase", id));
        }

        info!(id = %id, "Purchase deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM munji_purchases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &PurchaseFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(from) = filter.created_from() {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(before) = filter.created_before() {
        builder.push(" AND created_at < ").push_bind(before);
    }
    if let Some(payment_type) = filter.payment_type {
        builder.push(" AND payment_type = ").push_bind(payment_type);
    }
    if let Some(category_id) = &filter.category_id {
        builder.push(" AND category_id = ").push_bind(category_id.clone());
    }
    if let Some(supplier_id) = &filter.supplier_id {
        builder.push(" AND supplier_id = ").push_bind(supplier_id.clone());
    }
}
