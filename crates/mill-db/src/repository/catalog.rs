//! # Catalog Repository
//!
//! Suppliers and categories: two tables with the same shape
//! (`id`, unique `name`, `created_at`), served by one generic repository.
//!
//! Deleting a catalog entry cascades to the purchases that reference it and
//! to their expenses. The ledger is not rewritten.

use std::marker::PhantomData;

use chrono::Utc;
use mill_core::validation::validate_name;
use mill_core::{Category, Supplier, ValidationError};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;

/// A catalog table.
pub trait CatalogEntity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Name used in NotFound errors and logs.
    const ENTITY: &'static str;
    /// Field name used when another record references this one.
    const REFERENCE_FIELD: &'static str;
}

impl CatalogEntity for Supplier {
    const TABLE: &'static str = "suppliers";
    const ENTITY: &'static str = "Supplier";
    const REFERENCE_FIELD: &'static str = "supplier_id";
}

impl CatalogEntity for Category {
    const TABLE: &'static str = "categories";
    const ENTITY: &'static str = "Category";
    const REFERENCE_FIELD: &'static str = "category_id";
}

/// Fails with `UnknownReference` when `id` is not in `T`'s table.
pub(crate) async fn ensure_exists<T: CatalogEntity>(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<()> {
    let found: Option<i64> = sqlx::query_scalar(&format!("SELECT 1 FROM {} WHERE id = ?1", T::TABLE))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    if found.is_none() {
        return Err(ValidationError::unknown_reference(T::REFERENCE_FIELD, id).into());
    }
    Ok(())
}

/// Repository for one catalog table.
///
/// ## Usage
/// ```rust,ignore
/// let supplier = db.suppliers().create("Acme Traders").await?;
/// let all = db.categories().list().await?;
/// ```
#[derive(Debug)]
pub struct CatalogRepository<T> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for CatalogRepository<T> {
    fn clone(&self) -> Self {
        CatalogRepository {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: CatalogEntity> CatalogRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository {
            pool,
            _entity: PhantomData,
        }
    }

    /// Creates an entry. Names are trimmed and must be unique.
    pub async fn create(&self, name: &str) -> DbResult<T> {
        let name = validate_name("name", name)?;
        let id = new_id();

        debug!(entity = T::ENTITY, id = %id, name = %name, "Creating catalog entry");

        let entry = sqlx::query_as::<_, T>(&format!(
            "INSERT INTO {} (id, name, created_at) VALUES (?1, ?2, ?3) \
             RETURNING id, name, created_at",
            T::TABLE
        ))
        .bind(&id)
        .bind(&name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_name(e.into(), &name))?;

        info!(entity = T::ENTITY, id = %id, "Catalog entry created");
        Ok(entry)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<T>> {
        let entry = sqlx::query_as::<_, T>(&format!(
            "SELECT id, name, created_at FROM {} WHERE id = ?1",
            T::TABLE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// All entries ordered by name.
    pub async fn list(&self) -> DbResult<Vec<T>> {
        let entries = sqlx::query_as::<_, T>(&format!(
            "SELECT id, name, created_at FROM {} ORDER BY name",
            T::TABLE
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn rename(&self, id: &str, name: &str) -> DbResult<T> {
        let name = validate_name("name", name)?;

        debug!(entity = T::ENTITY, id = %id, name = %name, "Renaming catalog entry");

        let entry = sqlx::query_as::<_, T>(&format!(
            "UPDATE {} SET name = ?1 WHERE id = ?2 RETURNING id, name, created_at",
            T::TABLE
        ))
        .bind(&name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_name(e.into(), &name))?;

        entry.ok_or_else(|| DbError::not_found(T::ENTITY, id))
    }

    /// Deletes an entry and, by cascade, its purchases and their expenses.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", T::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(T::ENTITY, id));
        }

        info!(entity = T::ENTITY, id = %id, "Catalog entry deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", T::TABLE))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn duplicate_name(err: DbError, name: &str) -> DbError {
    if err.is_unique_violation() {
        ValidationError::duplicate("name", name).into()
    } else {
        err
    }
}
