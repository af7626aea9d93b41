//! PostgreSQL-backed video store

use catalog::{
    Category, StoreError, VideoEntry, VideoId, VideoStore,
    model::{ListFilter, NewVideoEntry, OrderAssignment, VideoPatch},
    store::StoreResult,
};
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use tracing::{error, info};

const COLUMNS: &str = "id, source_url, external_id, display_order, is_active, category, \
                       version, created_at, updated_at";

/// Video store over the `videos` table
///
/// Every update bumps `version`; a patch carrying `expected_version` only
/// applies while the stored version still matches.
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &PgRow) -> StoreResult<VideoEntry> {
    let category: String = row.try_get("category").map_err(map_sqlx)?;
    let category = category.parse::<Category>().map_err(StoreError::Rejected)?;

    Ok(VideoEntry {
        id: row.try_get("id").map_err(map_sqlx)?,
        source_url: row.try_get("source_url").map_err(map_sqlx)?,
        external_id: row.try_get("external_id").map_err(map_sqlx)?,
        display_order: row.try_get("display_order").map_err(map_sqlx)?,
        is_active: row.try_get("is_active").map_err(map_sqlx)?,
        category,
        version: row.try_get("version").map_err(map_sqlx)?,
        created_at: row.try_get("created_at").map_err(map_sqlx)?,
        updated_at: row.try_get("updated_at").map_err(map_sqlx)?,
    })
}

/// Constraint and payload errors are the caller's fault; anything else means
/// the database could not be used
fn map_sqlx(error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::Database(db) => StoreError::Rejected(db.message().to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Rejected(error.to_string())
        }
        other => {
            error!("Video store query failed: {}", other);
            StoreError::Unavailable(other.to_string())
        }
    }
}

/// Shared by single updates and the batched reorder
async fn update_on(
    conn: &mut PgConnection,
    id: VideoId,
    patch: &VideoPatch,
) -> StoreResult<VideoEntry> {
    let query = format!(
        r#"
        UPDATE videos
        SET display_order = COALESCE($2, display_order),
            is_active     = COALESCE($3, is_active),
            category      = COALESCE($4, category),
            version       = version + 1,
            updated_at    = NOW()
        WHERE id = $1
          AND ($5::BIGINT IS NULL OR version = $5)
        RETURNING {COLUMNS}
        "#
    );

    let row = sqlx::query(&query)
        .bind(id)
        .bind(patch.display_order)
        .bind(patch.is_active)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.expected_version)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx)?;

    match row {
        Some(row) => entry_from_row(&row),
        None => {
            // Either the row is gone or its version moved on.
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM videos WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .map_err(map_sqlx)?;

            Err(if exists {
                StoreError::Conflict(id)
            } else {
                StoreError::NotFound(id)
            })
        }
    }
}

impl VideoStore for PgVideoStore {
    async fn list(&self, filter: ListFilter) -> StoreResult<Vec<VideoEntry>> {
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM videos
            WHERE ($1 = FALSE OR is_active)
            ORDER BY display_order ASC, created_at DESC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(filter.active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn insert(&self, entry: NewVideoEntry) -> StoreResult<VideoEntry> {
        let query = format!(
            r#"
            INSERT INTO videos (source_url, external_id, display_order, is_active, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(&entry.source_url)
            .bind(&entry.external_id)
            .bind(entry.display_order)
            .bind(entry.is_active)
            .bind(entry.category.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let created = entry_from_row(&row)?;
        info!("Inserted video {} ({})", created.id, created.external_id);
        Ok(created)
    }

    async fn update(&self, id: VideoId, patch: VideoPatch) -> StoreResult<VideoEntry> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx)?;
        update_on(&mut *conn, id, &patch).await
    }

    async fn delete(&self, id: VideoId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!("Deleted video {}", id);
        Ok(())
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn apply_order(&self, assignments: &[OrderAssignment]) -> StoreResult<Vec<VideoEntry>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let mut rows = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            // Dropping the transaction on error rolls it back.
            rows.push(update_on(&mut *tx, assignment.id, &VideoPatch::from(*assignment)).await?);
        }

        tx.commit().await.map_err(map_sqlx)?;
        info!("Applied display order to {} videos", rows.len());
        Ok(rows)
    }
}
