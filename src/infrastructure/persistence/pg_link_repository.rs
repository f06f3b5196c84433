//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, Link, LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for links and their clicks.
///
/// Uniqueness of codes is enforced by the `links_code_key` constraint, and a
/// click append is a single statement, so concurrent writers never lose rows.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.code, row.original_url, row.created_at, row.expires_at)
    }
}

#[derive(FromRow)]
struct ClickRow {
    clicked_at: DateTime<Utc>,
    referrer: Option<String>,
    location: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click::new(row.clicked_at, row.referrer, row.location)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, original_url, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(new_link.created_at)
        .bind(new_link.expiry)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, original_url, created_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_record(&self, code: &str) -> Result<Option<LinkRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(row) = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, original_url, created_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let clicks = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT c.clicked_at, c.referrer, c.location
            FROM link_clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.code = $1
            ORDER BY c.id
            "#,
        )
        .bind(code)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(LinkRecord {
            link: Link::from(row),
            clicks: clicks.into_iter().map(Click::from).collect(),
        }))
    }

    async fn append_click(&self, code: &str, click: Click) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO link_clicks (link_id, clicked_at, referrer, location)
            SELECT id, $2, $3, $4
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .bind(click.timestamp)
        .bind(&click.referrer)
        .bind(&click.location)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                shortcode: code.to_string(),
            });
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
