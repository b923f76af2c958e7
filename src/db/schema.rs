//! SQL DDL for the catalog tables.
//!
//! Defines `drugs`, `interactions`, the `interaction_drugs` association table
//! and `schema_meta`. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

/// All schema DDL statements for the catalog.
const SCHEMA_SQL: &str = r#"
-- Drug catalog; side_effects holds a JSON array of strings
CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    instruction TEXT,
    side_effects TEXT
);

-- Interaction rules
CREATE TABLE IF NOT EXISTS interactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    risk_level TEXT NOT NULL
);

-- Rule membership (many-to-many)
CREATE TABLE IF NOT EXISTS interaction_drugs (
    interaction_id INTEGER REFERENCES interactions(id),
    drug_id TEXT REFERENCES drugs(id),
    PRIMARY KEY (interaction_id, drug_id)
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
