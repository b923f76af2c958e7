//! Drug catalog and interaction rules.
//!
//! The store is written once by [`import`] and read through
//! [`CatalogRepository`]; a [`Catalog`] is the immutable in-memory snapshot a
//! session works against.

pub mod import;
pub mod store;
pub mod types;

use anyhow::Result;

use types::{Drug, InteractionRule};

/// Read access to the catalog, as needed by the API service.
pub trait CatalogRepository: Send + Sync {
    /// All drugs.
    fn drugs(&self) -> Result<Vec<Drug>>;

    /// All interaction rules with at least one associated drug.
    fn interactions(&self) -> Result<Vec<InteractionRule>>;
}

/// A loaded catalog: every known drug plus the interaction rules over them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub drugs: Vec<Drug>,
    pub interactions: Vec<InteractionRule>,
}

impl Catalog {
    pub fn new(drugs: Vec<Drug>, interactions: Vec<InteractionRule>) -> Self {
        Self { drugs, interactions }
    }

    pub fn find(&self, id: &str) -> Option<&Drug> {
        self.drugs.iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_id() {
        let catalog = Catalog::new(
            vec![Drug {
                id: "d1".into(),
                name: "Aspirin".into(),
                instruction: None,
                side_effects: vec![],
            }],
            vec![],
        );
        assert_eq!(catalog.find("d1").map(|d| d.name.as_str()), Some("Aspirin"));
        assert!(catalog.find("d2").is_none());
    }
}
