use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::error::{Result, StorageError};
use snaplink_core::{
    Clock, CreateOutcome, LinkRecord, ReadSlugStore, Slug, SlugStore, SystemClock,
};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::trace;

/// DDL for the `links` table used by [`MySqlSlugStore`].
pub const SCHEMA: &str = include_str!("../ddl/mysql/links.sql");
/// DDL for the single-row table that serialises creation stamps.
pub const CLOCK_SCHEMA: &str = include_str!("../ddl/mysql/link_clock.sql");

const CLOCK_ROW_ID: u8 = 1;

/// MySQL implementation of the slug store contract.
///
/// The unique key on `slug` is the create-if-absent primitive: a duplicate
/// insert fails with a unique violation and is reported as
/// [`CreateOutcome::AlreadyExists`]. Increments run `clicks = clicks + 1` and
/// the read-back in one transaction. `created_at` is stored as microseconds
/// since the Unix epoch; the auto-increment `id` records insertion order.
///
/// Creates hold the `link_clock` row lock while stamping and inserting, so ids
/// and stamps are assigned in the same order across connections and processes.
/// A stamp is never older than the previous one, even if a clock steps back.
#[derive(Debug, Clone)]
pub struct MySqlSlugStore<C = SystemClock> {
    pool: MySqlPool,
    clock: C,
}

impl MySqlSlugStore<SystemClock> {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            clock: SystemClock,
        }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

impl<C: Clock> MySqlSlugStore<C> {
    pub fn with_clock(pool: MySqlPool, clock: C) -> Self {
        Self { pool, clock }
    }

    /// Creates the `links` and `link_clock` tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for ddl in [SCHEMA, CLOCK_SCHEMA] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }

        sqlx::query("INSERT IGNORE INTO link_clock (id, last_created_at) VALUES (?, 0)")
            .bind(CLOCK_ROW_ID)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", micros))
    })
}

fn row_to_record(row: &MySqlRow) -> Result<LinkRecord> {
    let slug: String = row.try_get("slug").map_err(map_sqlx_error)?;
    let destination_url: String = row.try_get("destination_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let clicks: u64 = row.try_get("clicks").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        slug: Slug::new_unchecked(slug),
        destination_url,
        created_at: parse_created_at(created_at)?,
        clicks,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl<C: Clock> ReadSlugStore for MySqlSlugStore<C> {
    async fn get(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT slug, destination_url, created_at, clicks
            FROM links
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, destination_url, created_at, clicks
            FROM links
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl<C: Clock> SlugStore for MySqlSlugStore<C> {
    async fn try_create(&self, slug: &Slug, destination_url: &str) -> Result<CreateOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let last: Option<i64> =
            sqlx::query_scalar("SELECT last_created_at FROM link_clock WHERE id = ? FOR UPDATE")
                .bind(CLOCK_ROW_ID)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        let Some(last) = last else {
            return Err(StorageError::InvalidData(
                "link_clock row is missing; run migrate first".to_string(),
            ));
        };

        let created_at = self.clock.now().max(parse_created_at(last)?);
        let micros = created_at.as_microsecond();

        let result = sqlx::query(
            r#"
            INSERT INTO links (slug, destination_url, created_at, clicks)
            VALUES (?, ?, ?, 0)
            "#,
        )
        .bind(slug.as_str())
        .bind(destination_url)
        .bind(micros)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                trace!(slug = %slug, "slug already present");
                tx.rollback().await.map_err(map_sqlx_error)?;
                return Ok(CreateOutcome::AlreadyExists);
            }
            Err(err) => return Err(map_sqlx_error(err)),
        }

        sqlx::query("UPDATE link_clock SET last_created_at = ? WHERE id = ?")
            .bind(micros)
            .bind(CLOCK_ROW_ID)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(CreateOutcome::Created(LinkRecord {
            slug: slug.clone(),
            destination_url: destination_url.to_owned(),
            created_at,
            clicks: 0,
        }))
    }

    async fn increment_clicks(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE slug = ?")
            .bind(slug.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT slug, destination_url, created_at, clicks
            FROM links
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let record = row_to_record(&row)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(record))
    }
}
