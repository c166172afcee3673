//! Database layer — migrations and the ledger event journal.

use art_restoration::{LedgerEvent, ProjectId};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;

/// A journal row as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalRecord {
    pub id: i64,
    pub event_type: String,
    pub project_id: i64,
    pub actor: Option<String>,
    pub amount: Option<String>,
    /// Full event as JSON text.
    pub payload: String,
    /// Unix milliseconds at insertion.
    pub created_at: i64,
}

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Every connection to an in-memory database sees its own empty database.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Journal writes
// ─────────────────────────────────────────────────────────

/// Append one event to the journal.
pub async fn insert_event(pool: &SqlitePool, event: &LedgerEvent) -> Result<()> {
    let payload = serde_json::to_string(event)?;

    sqlx::query(
        r#"
        INSERT INTO journal (event_type, project_id, actor, amount, payload, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(event.kind())
    .bind(event.project_id() as i64)
    .bind(event.actor().map(|a| a.as_str().to_string()))
    .bind(event.amount())
    .bind(payload)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Journal reads
// ─────────────────────────────────────────────────────────

/// Fetch all journal entries for a project, oldest first.
pub async fn get_events_for_project(
    pool: &SqlitePool,
    project_id: ProjectId,
) -> Result<Vec<JournalRecord>> {
    let rows = sqlx::query_as::<_, JournalRecord>(
        r#"
        SELECT id, event_type, project_id, actor, amount, payload, created_at
        FROM   journal
        WHERE  project_id = ?1
        ORDER  BY id ASC
        "#,
    )
    .bind(project_id as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch the whole journal, oldest first.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<JournalRecord>> {
    let rows = sqlx::query_as::<_, JournalRecord>(
        r#"
        SELECT id, event_type, project_id, actor, amount, payload, created_at
        FROM   journal
        ORDER  BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
