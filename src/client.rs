//! Catalog loading for the shell.
//!
//! The catalog is loaded once per session, either from a running API
//! ([`fetch_catalog`]) or straight from the import-format JSON files
//! ([`load_catalog_files`]). Failures are returned to the caller; nothing is
//! retried and no partial catalog is produced.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::catalog::import::read_records;
use crate::catalog::types::{Drug, DrugRecord, InteractionRecord, InteractionRule, RiskLevel};
use crate::catalog::Catalog;

/// Load drugs, then interactions, from the API at `base_url`.
pub async fn fetch_catalog(base_url: &str) -> Result<Catalog> {
    let client = reqwest::Client::new();
    let base = base_url.trim_end_matches('/');

    let drugs: Vec<Drug> = get_json(&client, &format!("{base}/drugs")).await?;
    let interactions: Vec<InteractionRule> =
        get_json(&client, &format!("{base}/interactions")).await?;

    tracing::info!(
        drugs = drugs.len(),
        interactions = interactions.len(),
        "catalog loaded from API"
    );
    Ok(Catalog::new(drugs, interactions))
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "{url} returned HTTP {}",
        response.status()
    );

    response
        .json::<T>()
        .await
        .with_context(|| format!("malformed JSON from {url}"))
}

/// Build a catalog directly from import files, without a database.
///
/// Drug records missing an id or name are dropped (as the store would), the
/// first record wins for a repeated id, and rules are numbered from 1 in file
/// order. Rules without drugs are dropped, matching the API.
pub fn load_catalog_files(drugs_path: &Path, interactions_path: &Path) -> Result<Catalog> {
    let drug_records: Vec<DrugRecord> = read_records(drugs_path)?;
    let interaction_records: Vec<InteractionRecord> = read_records(interactions_path)?;

    let mut drugs: Vec<Drug> = Vec::new();
    for record in drug_records {
        let (Some(id), Some(name)) = (record.id, record.name) else {
            continue;
        };
        if drugs.iter().any(|d| d.id == id) {
            continue;
        }
        drugs.push(Drug {
            id,
            name,
            instruction: record.instruction,
            side_effects: record.side_effects.unwrap_or_default(),
        });
    }

    let mut interactions: Vec<InteractionRule> = Vec::new();
    let mut next_id = 1;
    for record in interaction_records {
        let (Some(description), Some(level)) = (record.description, record.risk_level) else {
            continue;
        };
        let id = next_id;
        next_id += 1;

        let mut drug_ids: Vec<String> = Vec::new();
        for drug_id in record.drugs {
            if !drug_ids.contains(&drug_id) {
                drug_ids.push(drug_id);
            }
        }
        if drug_ids.is_empty() {
            continue;
        }
        interactions.push(InteractionRule {
            id,
            description,
            risk_level: RiskLevel::from(level),
            drug_ids,
        });
    }

    tracing::info!(
        drugs = drugs.len(),
        interactions = interactions.len(),
        "catalog loaded from files"
    );
    Ok(Catalog::new(drugs, interactions))
}
