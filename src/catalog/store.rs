//! Read path over the catalog tables.
//!
//! [`list_drugs`] and [`list_interactions`] are the two fixed queries behind the
//! API. [`SqliteCatalog`] is the process-wide store handle that owns the
//! connection and implements [`CatalogRepository`].

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::Mutex;

use crate::catalog::types::{Drug, InteractionRule, RiskLevel};
use crate::catalog::CatalogRepository;

/// All drug rows, in import order.
pub fn list_drugs(conn: &Connection) -> Result<Vec<Drug>> {
    let mut stmt =
        conn.prepare("SELECT id, name, instruction, side_effects FROM drugs ORDER BY rowid")?;
    let drugs = stmt
        .query_map([], drug_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(drugs)
}

fn drug_from_row(row: &Row<'_>) -> rusqlite::Result<Drug> {
    let side_effects: Option<String> = row.get(3)?;
    Ok(Drug {
        id: row.get(0)?,
        name: row.get(1)?,
        instruction: row.get(2)?,
        side_effects: decode_side_effects(side_effects.as_deref()),
    })
}

/// Decode the stored JSON list. Anything that is not a JSON array of strings
/// (NULL, `"null"`, a bare string) becomes an empty list.
fn decode_side_effects(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Option<Vec<String>>>(s).ok())
        .flatten()
        .unwrap_or_default()
}

/// All interaction rules that have at least one associated drug.
///
/// Inner join: a rule without association rows is not returned. Rows are
/// folded per rule id; drug ids keep association insertion order.
pub fn list_interactions(conn: &Connection) -> Result<Vec<InteractionRule>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.description, i.risk_level, d.drug_id \
         FROM interactions i \
         JOIN interaction_drugs d ON i.id = d.interaction_id \
         ORDER BY i.id, d.rowid",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut rules: Vec<InteractionRule> = Vec::new();
    for row in rows {
        let (id, description, risk_level, drug_id) = row?;
        match rules.last_mut() {
            Some(rule) if rule.id == id => rule.drug_ids.push(drug_id),
            _ => rules.push(InteractionRule {
                id,
                description,
                risk_level: RiskLevel::from(risk_level),
                drug_ids: vec![drug_id],
            }),
        }
    }

    Ok(rules)
}

/// SQLite-backed catalog handle. Opened once, shared by reference, and
/// released with [`SqliteCatalog::close`].
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (or create) the database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = crate::db::open_database(path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = crate::db::open_memory_database()?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("db lock poisoned: {e}"))?;
        f(&mut conn)
    }

    /// Close the underlying connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| anyhow!("db lock poisoned: {e}"))?;
        conn.close()
            .map_err(|(_, e)| e)
            .context("failed to close database")?;
        tracing::info!("database connection closed");
        Ok(())
    }
}

impl CatalogRepository for SqliteCatalog {
    fn drugs(&self) -> Result<Vec<Drug>> {
        self.with_conn(|conn| list_drugs(conn))
    }

    fn interactions(&self) -> Result<Vec<InteractionRule>> {
        self.with_conn(|conn| list_interactions(conn))
    }
}
