pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the catalog database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub drug_count: i64,
    pub interaction_count: i64,
    pub association_count: i64,
    /// Rules with no association rows. The API never returns these.
    pub orphan_interactions: i64,
    /// Association rows whose drug id is not in the catalog.
    pub dangling_associations: i64,
    pub interactions_imported_at: Option<String>,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

/// Gather row counts, referential anomalies and SQLite's integrity check.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let count = |sql: &str| -> Result<i64> {
        conn.query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("health query failed: {sql}"))
    };

    let schema_version = migrations::get_schema_version(conn)?;
    let drug_count = count("SELECT COUNT(*) FROM drugs")?;
    let interaction_count = count("SELECT COUNT(*) FROM interactions")?;
    let association_count = count("SELECT COUNT(*) FROM interaction_drugs")?;
    let orphan_interactions = count(
        "SELECT COUNT(*) FROM interactions i \
         WHERE NOT EXISTS (SELECT 1 FROM interaction_drugs d WHERE d.interaction_id = i.id)",
    )?;
    let dangling_associations = count(
        "SELECT COUNT(*) FROM interaction_drugs d \
         WHERE NOT EXISTS (SELECT 1 FROM drugs WHERE drugs.id = d.drug_id)",
    )?;
    let interactions_imported_at = migrations::interactions_imported_at(conn)?;

    let integrity_details: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .context("integrity check failed to run")?;
    let integrity_ok = integrity_details == "ok";

    Ok(HealthReport {
        schema_version,
        drug_count,
        interaction_count,
        association_count,
        orphan_interactions,
        dangling_associations,
        interactions_imported_at,
        integrity_ok,
        integrity_details,
    })
}
