//! # Expense Repository
//!
//! Expenses are charged against an existing purchase and paid from cash in
//! hand. The expense row and the cash deduction commit together.

use chrono::Utc;
use mill_core::{Expense, NewExpense, ValidationError};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::ledger::{lock_ledger, save_ledger};
use crate::repository::{new_id, rejected};

const COLUMNS: &str = "id, purchase_id, title, amount, created_at";

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense and deducts it from cash in hand.
    pub async fn create(&self, request: &NewExpense) -> DbResult<Expense> {
        let title = request
            .validate()
            .map_err(|e| rejected("create_expense", e))?;

        let id = new_id();

        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        ensure_purchase_exists(&mut tx, &request.purchase_id).await?;

        ledger
            .record_expense(request.amount)
            .map_err(|e| rejected("create_expense", e))?;

        debug!(id = %id, purchase_id = %request.purchase_id, amount = %request.amount, "Inserting expense");

        let expense = sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&request.purchase_id)
        .bind(&title)
        .bind(request.amount)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        info!(id = %expense.id, "Expense recorded");
        Ok(expense)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Newest first, optionally restricted to one purchase.
    pub async fn list(&self, purchase_id: Option<&str>) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses \
             WHERE (?1 IS NULL OR purchase_id = ?1) \
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}

async fn ensure_purchase_exists(conn: &mut SqliteConnection, purchase_id: &str) -> DbResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM munji_purchases WHERE id = ?1")
        .bind(purchase_id)
        .fetch_optional(&mut *conn)
        .await?;

    if found.is_none() {
        return Err(ValidationError::unknown_reference("purchase_id", purchase_id).into());
    }
    Ok(())
}
