//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use dosewise::config::DosewiseConfig;
use dosewise::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &DosewiseConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `dosewise import --drugs <file> --interactions <file>` to create it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Dosewise Health Report");
    println!("======================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!(
        "Interactions from: {}",
        report.interactions_imported_at.as_deref().unwrap_or("(never imported)")
    );
    println!();
    println!("Row counts:");
    println!("  Drugs:           {}", report.drug_count);
    println!("  Interactions:    {}", report.interaction_count);
    println!("  Drug links:      {}", report.association_count);
    println!();
    if report.orphan_interactions > 0 {
        println!(
            "WARNING: {} interaction rule(s) have no drugs and are never served by the API.",
            report.orphan_interactions
        );
    }
    if report.dangling_associations > 0 {
        println!(
            "WARNING: {} drug link(s) point at drug ids missing from the catalog.",
            report.dangling_associations
        );
    }
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Move the damaged file aside: mv {0} {0}.bad", db_path.display());
        println!("  2. Re-import the source data with `dosewise import`.");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
