//! # Production Repository
//!
//! Rice production runs consume munji from the ledger's inventory.
//!
//! ```text
//! BEGIN ─► lock_ledger ─► consume_inventory(quantity_produced)
//!                               │
//!                               ├── InsufficientInventory → ROLLBACK
//!                               ▼
//!                         INSERT rice_productions ─► save_ledger ─► COMMIT
//! ```
//!
//! Dryer and factory costs are recorded on the run but are not paid out of
//! cash in hand.

use chrono::Utc;
use mill_core::{NewProduction, Production};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::ledger::{lock_ledger, save_ledger};
use crate::repository::{new_id, rejected};

const COLUMNS: &str = "id, quantity_produced, dryer_cost, factory_cost, wastage, quality_of_rice, \
                       unit_price, total_quality, total_price, naku_price, naku_quantity, created_at";

#[derive(Debug, Clone)]
pub struct ProductionRepository {
    pool: SqlitePool,
}

impl ProductionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductionRepository { pool }
    }

    /// Records a production run and takes its munji out of inventory.
    pub async fn create(&self, request: &NewProduction) -> DbResult<Production> {
        let totals = request
            .validate()
            .map_err(|e| rejected("create_production", e))?;

        let id = new_id();

        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        ledger
            .consume_inventory(request.quantity_produced)
            .map_err(|e| rejected("create_production", e))?;

        debug!(
            id = %id,
            quantity_produced = %request.quantity_produced,
            total_quality = %totals.total_quality,
            total_price = %totals.total_price,
            "Inserting production"
        );

        let production = sqlx::query_as::<_, Production>(&format!(
            "INSERT INTO rice_productions ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(request.quantity_produced)
        .bind(request.dryer_cost)
        .bind(request.factory_cost)
        .bind(request.wastage)
        .bind(request.quality_of_rice)
        .bind(request.unit_price)
        .bind(totals.total_quality)
        .bind(totals.total_price)
        .bind(request.naku_price)
        .bind(request.naku_quantity)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        info!(id = %production.id, "Production recorded");
        Ok(production)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Production>> {
        let production = sqlx::query_as::<_, Production>(&format!(
            "SELECT {COLUMNS} FROM rice_productions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(production)
    }

    /// All runs, newest first.
    pub async fn list(&self) -> DbResult<Vec<Production>> {
        let productions = sqlx::query_as::<_, Production>(&format!(
            "SELECT {COLUMNS} FROM rice_productions ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(productions)
    }
}
