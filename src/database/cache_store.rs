//! # Menu Cache Store
//!
//! Reads and writes for the `"DocCache"` table.
//!
//! The table has no uniqueness constraint. Consistency comes from the write
//! discipline here: a cell is only ever changed by [`CacheStore::replace_cell`],
//! which deletes and re-inserts the whole cell inside one transaction.
//! Readers therefore see either the previous rows of a cell or the new ones,
//! never a mixture.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::models::{CacheCell, CacheEntry, Meal};

/// Rows per INSERT statement; 5 binds per row keeps well under the
/// Postgres limit of 65535 parameters.
const INSERT_CHUNK_ROWS: usize = 1_000;

/// Row counts from one cell replacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellWrite {
    pub deleted: u64,
    pub inserted: u64,
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    pool: PgPool,
}

impl CacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Delete every row older than `day` in a single statement
    #[instrument(skip(self))]
    pub async fn prune_before(&self, day: NaiveDate) -> Result<u64> {
        let pruned = sqlx::query(r#"DELETE FROM "DocCache" WHERE day < $1"#)
            .bind(day)
            .execute(&self.pool)
            .await?
            .rows_affected();

        debug!(pruned = pruned, "Pruned cache rows outside the retention window");
        Ok(pruned)
    }

    /// Replace a cell's rows with `meals` atomically.
    ///
    /// An empty `meals` leaves the cell empty. On any failure the transaction
    /// is rolled back and the cell keeps its previous rows.
    #[instrument(skip(self, meals), fields(cell = %cell, meals = meals.len()))]
    pub async fn replace_cell(&self, cell: &CacheCell, meals: &[Meal]) -> Result<CellWrite> {
        let mut tx = self.pool.begin().await?;

        match Self::write_cell(&mut tx, cell, meals).await {
            Ok(write) => {
                tx.commit().await?;
                debug!(
                    deleted = write.deleted,
                    inserted = write.inserted,
                    "Replaced cache cell"
                );
                Ok(write)
            }
            Err(e) => {
                warn!(error = %e, "Cache cell write failed, rolling back");
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed; connection drop will discard the transaction");
                }
                Err(e)
            }
        }
    }

    async fn write_cell(
        tx: &mut Transaction<'_, Postgres>,
        cell: &CacheCell,
        meals: &[Meal],
    ) -> Result<CellWrite> {
        let deleted = sqlx::query(
            r#"DELETE FROM "DocCache" WHERE day = $1 AND location = $2 AND mealtime = $3"#,
        )
        .bind(cell.day)
        .bind(&cell.location)
        .bind(cell.mealtime())
        .execute(&mut **tx)
        .await?
        .rows_affected();

        let mut inserted = 0;
        for chunk in meals.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                r#"INSERT INTO "DocCache" (day, location, mealtime, meal, mealid) "#,
            );
            builder.push_values(chunk, |mut row, meal| {
                row.push_bind(cell.day)
                    .push_bind(cell.location.clone())
                    .push_bind(cell.mealtime())
                    .push_bind(meal.name.clone())
                    .push_bind(meal.id.clone());
            });
            inserted += builder.build().execute(&mut **tx).await?.rows_affected();
        }

        Ok(CellWrite { deleted, inserted })
    }

    /// Rows of one cell; the Query API's read path
    pub async fn menu_for_cell(&self, cell: &CacheCell) -> Result<Vec<CacheEntry>> {
        let entries = sqlx::query_as::<_, CacheEntry>(
            r#"
            SELECT day, location, mealtime, meal, mealid
            FROM "DocCache"
            WHERE day = $1 AND location = $2 AND mealtime = $3
            ORDER BY meal, mealid
            "#,
        )
        .bind(cell.day)
        .bind(&cell.location)
        .bind(cell.mealtime())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Every row for one day; what the preference matcher joins on `meal`
    pub async fn entries_on(&self, day: NaiveDate) -> Result<Vec<CacheEntry>> {
        let entries = sqlx::query_as::<_, CacheEntry>(
            r#"
            SELECT day, location, mealtime, meal, mealid
            FROM "DocCache"
            WHERE day = $1
            ORDER BY location, mealtime, meal, mealid
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Number of rows older than `day`
    pub async fn count_before(&self, day: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "DocCache" WHERE day < $1"#)
            .bind(day)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
