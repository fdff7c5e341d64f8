//! Miscellaneous costs: cash outflows not tied to any purchase.

use chrono::Utc;
use mill_core::{MiscellaneousCost, NewMiscellaneousCost};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::ledger::{lock_ledger, save_ledger};
use crate::repository::{new_id, rejected};

const COLUMNS: &str = "id, title, amount, created_at";

#[derive(Debug, Clone)]
pub struct MiscCostRepository {
    pool: SqlitePool,
}

impl MiscCostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MiscCostRepository { pool }
    }

    /// Records the cost and deducts it from cash in hand.
    pub async fn create(&self, request: &NewMiscellaneousCost) -> DbResult<MiscellaneousCost> {
        let title = request
            .validate()
            .map_err(|e| rejected("create_miscellaneous_cost", e))?;

        let id = new_id();

        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        ledger
            .record_miscellaneous(request.amount)
            .map_err(|e| rejected("create_miscellaneous_cost", e))?;

        debug!(id = %id, amount = %request.amount, "Inserting miscellaneous cost");

        let cost = sqlx::query_as::<_, MiscellaneousCost>(&format!(
            "INSERT INTO miscellaneous_costs ({COLUMNS}) VALUES (?1, ?2, ?3, ?4) RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&title)
        .bind(request.amount)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        info!(id = %cost.id, "Miscellaneous cost recorded");
        Ok(cost)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<MiscellaneousCost>> {
        let cost = sqlx::query_as::<_, MiscellaneousCost>(&format!(
            "SELECT {COLUMNS} FROM miscellaneous_costs WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cost)
    }

    /// All costs, newest first.
    pub async fn list(&self) -> DbResult<Vec<MiscellaneousCost>> {
        let costs = sqlx::query_as::<_, MiscellaneousCost>(&format!(
            "SELECT {COLUMNS} FROM miscellaneous_costs ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(costs)
    }
}
