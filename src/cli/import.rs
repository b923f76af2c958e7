use anyhow::{bail, Result};
use std::path::Path;

use dosewise::catalog::import::{bootstrap_interactions, import_drugs, read_records};
use dosewise::catalog::types::{DrugRecord, InteractionRecord};
use dosewise::config::DosewiseConfig;
use dosewise::db;

/// Import drug and/or interaction files into the configured database.
///
/// Drug import can be repeated safely. Interaction import creates new rules on
/// every run, so a second run is refused unless `force` is set.
pub fn import(
    config: &DosewiseConfig,
    drugs: Option<&Path>,
    interactions: Option<&Path>,
    force: bool,
) -> Result<()> {
    if drugs.is_none() && interactions.is_none() {
        bail!("nothing to import: pass --drugs and/or --interactions");
    }

    let db_path = config.resolved_db_path();
    let mut conn = db::open_database(&db_path)?;

    if let Some(path) = drugs {
        let records: Vec<DrugRecord> = read_records(path)?;
        println!("Importing {} drugs from {}...", records.len(), path.display());
        let report = import_drugs(&mut conn, &records)?;
        println!("  Inserted: {}", report.inserted);
        println!("  Skipped:  {} (already present or incomplete)", report.skipped);
    }

    if let Some(path) = interactions {
        let records: Vec<InteractionRecord> = read_records(path)?;
        println!("Importing {} interactions from {}...", records.len(), path.display());
        let report = bootstrap_interactions(&mut conn, &records, force)?;
        println!("  Rules inserted:     {}", report.inserted);
        println!("  Drug links created: {}", report.associations);
        if report.skipped > 0 {
            println!("  Rules skipped:      {} (missing description or level)", report.skipped);
        }
    }

    println!("Import complete: {}", db_path.display());
    Ok(())
}
