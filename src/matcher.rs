//! Find catalog drugs mentioned in recognized text.

use crate::catalog::types::Drug;

/// Drugs found in a text that were not yet on the personal list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub added: Vec<Drug>,
}

impl MatchReport {
    pub fn count(&self) -> usize {
        self.added.len()
    }

    /// User-facing summary.
    pub fn message(&self) -> String {
        match self.count() {
            0 => "no match found: none of the recognized text names a catalog drug".to_string(),
            1 => "added 1 drug from the recognized text".to_string(),
            n => format!("added {n} drugs from the recognized text"),
        }
    }
}

/// Every catalog drug whose name occurs verbatim in `text` and whose id is not
/// in `current_ids`, in catalog order.
///
/// Matching is case-sensitive substring containment; empty names never match.
pub fn match_names(text: &str, catalog: &[Drug], current_ids: &[&str]) -> MatchReport {
    let mut added: Vec<Drug> = Vec::new();
    for drug in catalog {
        if drug.name.is_empty() || !text.contains(drug.name.as_str()) {
            continue;
        }
        let known = current_ids.contains(&drug.id.as_str()) || added.iter().any(|d| d.id == drug.id);
        if !known {
            added.push(drug.clone());
        }
    }

    tracing::debug!(matched = added.len(), text_len = text.len(), "name matching finished");
    MatchReport { added }
}
