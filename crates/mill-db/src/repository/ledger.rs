//! # Ledger Repository
//!
//! Persistence of the singleton [`Ledger`] row (`id = 1`).
//!
//! ## Locking
//! ```text
//! BEGIN (deferred)
//!   INSERT OR IGNORE INTO ledger (id) VALUES (1)   ← write statement: takes the
//!   UPDATE ledger SET id = id WHERE id = 1         ← RESERVED lock before any read
//!   SELECT ... FROM ledger WHERE id = 1            ← sees the latest committed state
//!   ... mutate in memory ...
//!   UPDATE ledger SET ... WHERE id = 1
//! COMMIT
//! ```
//! Two concurrent writers cannot both read the same ledger state: the second
//! one waits on the lock (up to the busy timeout) and then reads the first
//! one's result.

use chrono::Utc;
use mill_core::{CoreResult, Ledger, LedgerAdjustment, Money, LEDGER_ID};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::rejected;

/// Takes the write lock and reads the ledger, creating the row on first use.
pub(crate) async fn lock_ledger(conn: &mut SqliteConnection) -> DbResult<Ledger> {
    sqlx::query("INSERT OR IGNORE INTO ledger (id) VALUES (?1)")
        .bind(LEDGER_ID)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE ledger SET id = id WHERE id = ?1")
        .bind(LEDGER_ID)
        .execute(&mut *conn)
        .await?;

    let ledger = sqlx::query_as::<_, Ledger>(
        "SELECT capital, cash_in_hand, sales, munji_inventory FROM ledger WHERE id = ?1",
    )
    .bind(LEDGER_ID)
    .fetch_one(&mut *conn)
    .await?;

    Ok(ledger)
}

/// Writes the ledger back. Must run in the transaction that locked it.
pub(crate) async fn save_ledger(conn: &mut SqliteConnection, ledger: &Ledger) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE ledger
        SET capital = ?1, cash_in_hand = ?2, sales = ?3, munji_inventory = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(ledger.capital())
    .bind(ledger.cash_in_hand())
    .bind(ledger.sales())
    .bind(ledger.munji_inventory())
    .bind(Utc::now())
    .bind(LEDGER_ID)
    .execute(&mut *conn)
    .await?;

    debug!(
        capital = %ledger.capital(),
        cash_in_hand = %ledger.cash_in_hand(),
        sales = %ledger.sales(),
        munji_inventory = %ledger.munji_inventory(),
        "Ledger saved"
    );
    Ok(())
}

/// Repository for the ledger singleton.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Current ledger state (get-or-create).
    pub async fn get(&self) -> DbResult<Ledger> {
        sqlx::query("INSERT OR IGNORE INTO ledger (id) VALUES (?1)")
            .bind(LEDGER_ID)
            .execute(&self.pool)
            .await?;

        let ledger = sqlx::query_as::<_, Ledger>(
            "SELECT capital, cash_in_hand, sales, munji_inventory FROM ledger WHERE id = ?1",
        )
        .bind(LEDGER_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(ledger)
    }

    pub async fn add_capital(&self, amount: Money) -> DbResult<Ledger> {
        self.mutate("add_capital", |ledger| ledger.add_capital(amount))
            .await
    }

    pub async fn move_capital_to_cash(&self, amount: Money) -> DbResult<Ledger> {
        self.mutate("move_capital_to_cash", |ledger| {
            ledger.move_capital_to_cash(amount)
        })
        .await
    }

    pub async fn record_sale(&self, amount: Money) -> DbResult<Ledger> {
        self.mutate("record_sale", |ledger| ledger.record_sale(amount))
            .await
    }

    /// Applies an operator adjustment; all deltas or none.
    pub async fn adjust(&self, adjustment: &LedgerAdjustment) -> DbResult<Ledger> {
        let ledger = self
            .mutate("adjust", |ledger| ledger.apply_adjustment(adjustment))
            .await?;

        info!(?adjustment, "Ledger adjusted");
        Ok(ledger)
    }

    async fn mutate(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Ledger) -> CoreResult<()>,
    ) -> DbResult<Ledger> {
        let mut tx = self.pool.begin().await?;
        let mut ledger = lock_ledger(&mut tx).await?;

        f(&mut ledger).map_err(|e| rejected(operation, e))?;

        save_ledger(&mut tx, &ledger).await?;
        tx.commit().await?;

        debug!(operation, "Ledger operation committed");
        Ok(ledger)
    }
}
