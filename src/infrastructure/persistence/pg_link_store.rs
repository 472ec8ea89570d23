//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LIST_LIMIT, LinkStore};
use crate::error::{AppError, map_insert_error, map_sqlx_error};

/// Ordering shared with the file backend: newest first, ties by code.
const LIST_SQL: &str = r#"
    SELECT code, url, secret, clicks, created_at, expires_at
    FROM links
    ORDER BY created_at DESC, code ASC
    LIMIT $1
"#;

/// Link store backed by PostgreSQL.
///
/// Statements are prepared with bound parameters; the unique-key collision
/// on insert is the only error translated into a domain variant, the rest
/// surface as [`AppError::BackendUnavailable`].
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    /// Creates a store over an already-connected pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn init(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                code       TEXT PRIMARY KEY,
                url        TEXT NOT NULL,
                secret     TEXT NOT NULL,
                clicks     BIGINT NOT NULL DEFAULT 0,
                created_at BIGINT NOT NULL,
                expires_at BIGINT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_created_at ON links (created_at DESC)")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, AppError> {
        sqlx::query_as::<_, Link>(
            r#"
            SELECT code, url, secret, clicks, created_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn get_all(&self) -> Result<Vec<Link>, AppError> {
        sqlx::query_as::<_, Link>(LIST_SQL)
            .bind(LIST_LIMIT as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create(&self, link: NewLink) -> Result<Link, AppError> {
        sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (code, url, secret, clicks, created_at, expires_at)
            VALUES ($1, $2, $3, 0, $4, $5)
            RETURNING code, url, secret, clicks, created_at, expires_at
            "#,
        )
        .bind(&link.code)
        .bind(&link.url)
        .bind(&link.secret)
        .bind(link.created_at)
        .bind(link.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(&link.code, e))
    }

    async fn remove(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<i64>, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE code = $1
            RETURNING clicks
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
