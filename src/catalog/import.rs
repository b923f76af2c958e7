//! Write path: one-time data import into the catalog tables.
//!
//! [`import_drugs`] is idempotent: rows are inserted with `INSERT OR IGNORE`
//! so an existing id is never overwritten. [`import_interactions`] is not:
//! every call creates fresh rule rows, so it must run once per store.
//! [`bootstrap_interactions`] enforces that with a marker in `schema_meta`.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Transaction};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::catalog::types::{DrugRecord, InteractionRecord};
use crate::db::migrations;

/// Outcome of an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows newly written.
    pub inserted: usize,
    /// Rows the store ignored (duplicate id or rejected by a constraint).
    pub skipped: usize,
    /// Association rows written (interaction import only).
    pub associations: usize,
}

/// Read an import file (a JSON array of records).
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read import file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse import JSON: {}", path.display()))
}

/// Insert drugs, keeping any row whose id already exists.
///
/// Runs in one transaction. Records missing `id` or `name` are ignored by the
/// store (NOT NULL conflicts fall under `OR IGNORE`) and counted as skipped.
pub fn import_drugs(conn: &mut Connection, records: &[DrugRecord]) -> Result<ImportReport> {
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO drugs (id, name, instruction, side_effects) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for record in records {
            let side_effects = record
                .side_effects
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let changed = stmt.execute(params![
                record.id,
                record.name,
                record.instruction,
                side_effects,
            ])?;
            if changed == 0 {
                tracing::debug!(id = ?record.id, "drug row ignored");
                report.skipped += 1;
            } else {
                report.inserted += 1;
            }
        }
    }
    tx.commit()?;

    tracing::info!(inserted = report.inserted, skipped = report.skipped, "drug import finished");
    Ok(report)
}

/// Insert interaction rules and their drug associations.
///
/// Each record always produces a new rule row, so re-running the same import
/// duplicates every rule. Duplicate drug ids within one record collapse to a
/// single association. A record the store rejects (missing description or
/// level) is skipped together with its associations.
pub fn import_interactions(
    conn: &mut Connection,
    records: &[InteractionRecord],
) -> Result<ImportReport> {
    let tx = conn.transaction()?;
    let report = insert_interactions(&tx, records)?;
    tx.commit()?;

    log_interaction_report(&report);
    Ok(report)
}

/// Import interaction rules once per store.
///
/// Refuses to run when the store already carries the bootstrap marker, unless
/// `force` is set. The rules and the marker are written in one transaction.
pub fn bootstrap_interactions(
    conn: &mut Connection,
    records: &[InteractionRecord],
    force: bool,
) -> Result<ImportReport> {
    let tx = conn.transaction()?;

    if let Some(at) = migrations::interactions_imported_at(&tx)? {
        if !force {
            bail!(
                "interactions were already imported at {at}; importing again duplicates every rule (use --force to do it anyway)"
            );
        }
        tracing::warn!(first_import = %at, "re-importing interactions; rules will be duplicated");
    }

    let report = insert_interactions(&tx, records)?;
    migrations::mark_interactions_imported(&tx)?;
    tx.commit()?;

    log_interaction_report(&report);
    Ok(report)
}

fn insert_interactions(tx: &Transaction<'_>, records: &[InteractionRecord]) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut rule_stmt =
        tx.prepare("INSERT INTO interactions (description, risk_level) VALUES (?1, ?2)")?;
    let mut assoc_stmt = tx.prepare(
        "INSERT OR IGNORE INTO interaction_drugs (interaction_id, drug_id) VALUES (?1, ?2)",
    )?;

    for record in records {
        let rule_id = match rule_stmt.insert(params![record.description, record.risk_level]) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, description = ?record.description, "interaction row rejected");
                report.skipped += 1;
                continue;
            }
        };
        report.inserted += 1;

        for drug_id in &record.drugs {
            report.associations += assoc_stmt.execute(params![rule_id, drug_id])?;
        }
    }
    Ok(report)
}

fn log_interaction_report(report: &ImportReport) {
    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        associations = report.associations,
        "interaction import finished"
    );
}
