//! PostgreSQL implementation of short link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ShortLinkRow {
    id: i64,
    short_key: String,
    target_url: String,
    is_private: bool,
    created_by: Option<i64>,
    owner_name: Option<String>,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        let owner = match (row.created_by, row.owner_name) {
            (Some(id), Some(name)) => Some(Owner::new(id, name)),
            _ => None,
        };

        ShortLink {
            id: row.id,
            key: row.short_key,
            target_url: row.target_url,
            is_private: row.is_private,
            owner,
            click_count: row.click_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for short links.
///
/// Key uniqueness is enforced by the `short_links_short_key_key` constraint;
/// click counting is a single atomic `UPDATE`.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            WITH inserted AS (
                INSERT INTO short_links
                    (short_key, target_url, is_private, created_by, created_at, updated_at, expires_at)
                VALUES ($1, $2, $3, $4, $5, $5, $6)
                RETURNING *
            )
            SELECT
                i.id, i.short_key, i.target_url, i.is_private, i.created_by,
                u.name AS owner_name,
                i.click_count, i.created_at, i.updated_at, i.expires_at
            FROM inserted i
            LEFT JOIN users u ON u.id = i.created_by
            "#,
        )
        .bind(&new_link.key)
        .bind(&new_link.target_url)
        .bind(new_link.is_private)
        .bind(new_link.owner.as_ref().map(|o| o.id))
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::KeyConflict { .. } => AppError::KeyConflict {
                key: new_link.key.clone(),
            },
            other => other,
        })?;

        Ok(row.into())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT
                l.id, l.short_key, l.target_url, l.is_private, l.created_by,
                u.name AS owner_name,
                l.click_count, l.created_at, l.updated_at, l.expires_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.created_by
            WHERE l.short_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM short_links WHERE short_key = $1)")
                .bind(key)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list_public(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<ShortLink>, u64), AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE is_private = FALSE")
                .fetch_one(self.pool.as_ref())
                .await?;

        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT
                l.id, l.short_key, l.target_url, l.is_private, l.created_by,
                u.name AS owner_name,
                l.click_count, l.created_at, l.updated_at, l.expires_at
            FROM short_links l
            LEFT JOIN users u ON u.id = l.created_by
            WHERE l.is_private = FALSE
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(to_i64(limit))
        .bind(to_i64(offset))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok((
            rows.into_iter().map(Into::into).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn increment_click_count(&self, key: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            WITH updated AS (
                UPDATE short_links
                SET click_count = click_count + 1, updated_at = NOW()
                WHERE short_key = $1
                RETURNING *
            )
            SELECT
                l.id, l.short_key, l.target_url, l.is_private, l.created_by,
                u.name AS owner_name,
                l.click_count, l.created_at, l.updated_at, l.expires_at
            FROM updated l
            LEFT JOIN users u ON u.id = l.created_by
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
