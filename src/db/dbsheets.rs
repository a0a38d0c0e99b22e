use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Error as SqlxError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use crate::models::spreadsheet::SharedEntry;

// Global database instance
static DB: OnceCell<Arc<DbSheets>> = OnceCell::const_new();

/// Initialize the global database connection
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
pub async fn init_db(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = DbSheets::new(database_url).await?;
    DB.set(Arc::new(db))
        .map_err(|_| "Database already initialized")?;
    Ok(())
}

/// Get the global database instance
pub fn get_db() -> Option<Arc<DbSheets>> {
    DB.get().cloned()
}

/// Spreadsheet row from the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpreadsheetRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub owner: String,
    pub shared_with: Json<Vec<SharedEntry>>,
    pub created_at: DateTime<Utc>,
}

impl From<SpreadsheetRow> for crate::models::SpreadsheetResponse {
    fn from(row: SpreadsheetRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            owner: row.owner,
            shared_with: row.shared_with.0,
            created_at: row.created_at,
        }
    }
}

/// Database connection pool
pub struct DbSheets {
    pool: PgPool,
}

impl DbSheets {
    /// Create a new database connection pool
    pub async fn new(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS spreadsheets (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title TEXT NOT NULL,
                owner TEXT NOT NULL,
                shared_with JSONB NOT NULL DEFAULT '[]'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Create a new spreadsheet owned by a user
    pub async fn create_spreadsheet(
        &self,
        title: &str,
        owner: &str,
    ) -> Result<SpreadsheetRow, SqlxError> {
        let query_sql = r#"
            INSERT INTO spreadsheets (title, owner)
            VALUES ($1, $2)
            RETURNING id, title, owner, shared_with, created_at
        "#;

        sqlx::query_as::<_, SpreadsheetRow>(query_sql)
            .bind(title)
            .bind(owner)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a spreadsheet by its id
    pub async fn find_spreadsheet(
        &self,
        id: uuid::Uuid,
    ) -> Result<Option<SpreadsheetRow>, SqlxError> {
        let query_sql = r#"
            SELECT id, title, owner, shared_with, created_at
            FROM spreadsheets
            WHERE id = $1
        "#;

        sqlx::query_as::<_, SpreadsheetRow>(query_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find all spreadsheets a user owns
    pub async fn find_spreadsheets_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<SpreadsheetRow>, SqlxError> {
        let query_sql = r#"
            SELECT id, title, owner, shared_with, created_at
            FROM spreadsheets
            WHERE owner = $1
            ORDER BY created_at DESC
        "#;

        sqlx::query_as::<_, SpreadsheetRow>(query_sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
    }

    /// Replace a spreadsheet's shared-access list
    pub async fn update_sharing(
        &self,
        id: uuid::Uuid,
        shared_with: &[SharedEntry],
    ) -> Result<Option<SpreadsheetRow>, SqlxError> {
        let query_sql = r#"
            UPDATE spreadsheets
            SET shared_with = $2
            WHERE id = $1
            RETURNING id, title, owner, shared_with, created_at
        "#;

        sqlx::query_as::<_, SpreadsheetRow>(query_sql)
            .bind(id)
            .bind(Json(shared_with))
            .fetch_optional(&self.pool)
            .await
    }
}
