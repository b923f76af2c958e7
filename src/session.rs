//! Per-user session state behind the shell.
//!
//! A [`Session`] owns the loaded [`Catalog`], the [`PersonalDrugList`] and the
//! unpersisted [`HealthEntry`]. The risk finding and the schedule plan are
//! recomputed in full after every list mutation and are never edited directly.

use crate::catalog::types::{Drug, InteractionRule};
use crate::catalog::Catalog;
use crate::matcher::{self, MatchReport};
use crate::risk;
use crate::schedule::{self, PlanEntry};

/// Ordered set of drugs, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDrugList {
    drugs: Vec<Drug>,
}

impl PersonalDrugList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `drug` unless its id is already present. Returns whether it was added.
    pub fn add(&mut self, drug: Drug) -> bool {
        if self.contains(&drug.id) {
            return false;
        }
        self.drugs.push(drug);
        true
    }

    /// Remove the drug with `id`. Returns the removed drug, if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Drug> {
        let pos = self.drugs.iter().position(|d| d.id == id)?;
        Some(self.drugs.remove(pos))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.drugs.iter().any(|d| d.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.drugs.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}

/// Self-reported health values. Held for the session only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthEntry {
    /// e.g. `120/80` (mmHg)
    pub blood_pressure: Option<String>,
    /// e.g. `5.6` (mmol/L)
    pub blood_sugar: Option<String>,
    pub feelings: Option<String>,
}

/// Which health field to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthField {
    BloodPressure,
    BloodSugar,
    Feelings,
}

impl std::str::FromStr for HealthField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bp" | "blood_pressure" => Ok(Self::BloodPressure),
            "sugar" | "blood_sugar" => Ok(Self::BloodSugar),
            "feelings" => Ok(Self::Feelings),
            _ => Err(format!("unknown health field: {s} (expected bp, sugar or feelings)")),
        }
    }
}

impl HealthEntry {
    /// Set a field; an empty value clears it.
    pub fn set(&mut self, field: HealthField, value: &str) {
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match field {
            HealthField::BloodPressure => self.blood_pressure = value,
            HealthField::BloodSugar => self.blood_sugar = value,
            HealthField::Feelings => self.feelings = value,
        }
    }
}

/// Result of [`Session::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyListed,
    UnknownDrug,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: Catalog,
    list: PersonalDrugList,
    risk: Option<InteractionRule>,
    plan: Vec<PlanEntry>,
    pub health: HealthEntry,
}

impl Session {
    /// Start a session with an empty personal list.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list(&self) -> &PersonalDrugList {
        &self.list
    }

    pub fn risk(&self) -> Option<&InteractionRule> {
        self.risk.as_ref()
    }

    pub fn plan(&self) -> &[PlanEntry] {
        &self.plan
    }

    /// Add the catalog drug with `id` to the personal list.
    pub fn add(&mut self, id: &str) -> AddOutcome {
        let Some(drug) = self.catalog.find(id).cloned() else {
            return AddOutcome::UnknownDrug;
        };
        if !self.list.add(drug) {
            return AddOutcome::AlreadyListed;
        }
        tracing::info!(drug = %id, "drug added to personal list");
        self.recompute();
        AddOutcome::Added
    }

    /// Remove `id` from the personal list. Returns whether anything changed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.list.remove(id).is_none() {
            return false;
        }
        tracing::info!(drug = %id, "drug removed from personal list");
        self.recompute();
        true
    }

    /// Add every catalog drug named in `text` that is not listed yet.
    pub fn apply_recognized_text(&mut self, text: &str) -> MatchReport {
        let report = matcher::match_names(text, &self.catalog.drugs, &self.list.ids());
        if report.count() > 0 {
            for drug in &report.added {
                self.list.add(drug.clone());
            }
            tracing::info!(added = report.count(), "drugs added from recognized text");
            self.recompute();
        }
        report
    }

    fn recompute(&mut self) {
        self.risk = risk::evaluate(self.list.ids(), &self.catalog.interactions).cloned();
        self.plan = schedule::generate_plan(self.list.drugs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::RiskLevel;

    fn drug(id: &str, name: &str, instruction: &str) -> Drug {
        Drug {
            id: id.into(),
            name: name.into(),
            instruction: Some(instruction.into()),
            side_effects: vec![],
        }
    }

    fn test_session() -> Session {
        Session::new(Catalog::new(
            vec![
                drug("a", "Aspirin", "once daily"),
                drug("b", "Warfarin", "once daily, before meal"),
                drug("c", "Vitamin C", "with water"),
            ],
            vec![InteractionRule {
                id: 1,
                description: "bleeding risk".into(),
                risk_level: RiskLevel::Red,
                drug_ids: vec!["a".into(), "b".into()],
            }],
        ))
    }

    #[test]
    fn list_rejects_duplicate_ids() {
        let mut list = PersonalDrugList::new();
        assert!(list.add(drug("a", "Aspirin", "")));
        assert!(!list.add(drug("a", "Aspirin again", "")));
        assert_eq!(list.len(), 1);
        assert!(list.remove("a").is_some());
        assert!(list.remove("a").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn add_and_remove_recompute_risk() {
        let mut session = test_session();
        assert_eq!(session.add("a"), AddOutcome::Added);
        assert!(session.risk().is_none());

        assert_eq!(session.add("b"), AddOutcome::Added);
        assert_eq!(session.risk().map(|r| r.id), Some(1));

        assert!(session.remove("b"));
        assert!(session.risk().is_none());
    }

    #[test]
    fn add_reports_unknown_and_duplicates() {
        let mut session = test_session();
        assert_eq!(session.add("zzz"), AddOutcome::UnknownDrug);
        assert_eq!(session.add("a"), AddOutcome::Added);
        assert_eq!(session.add("a"), AddOutcome::AlreadyListed);
        assert!(!session.remove("zzz"));
        assert_eq!(session.list().len(), 1);
    }

    #[test]
    fn plan_follows_list() {
        let mut session = test_session();
        session.add("a");
        session.add("b");
        session.add("c");
        let times: Vec<&str> = session.plan().iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, vec!["07:30", "08:30"]);

        session.remove("b");
        assert_eq!(session.plan().len(), 1);
        assert_eq!(session.plan()[0].task, "take Aspirin");
    }

    #[test]
    fn recognized_text_adds_new_drugs_only() {
        let mut session = test_session();
        session.add("a");

        let report = session.apply_recognized_text("Aspirin 100mg; Warfarin 2mg");
        assert_eq!(report.count(), 1);
        assert_eq!(session.list().ids(), vec!["a", "b"]);
        assert_eq!(session.risk().map(|r| r.id), Some(1));

        let again = session.apply_recognized_text("Aspirin 100mg; Warfarin 2mg");
        assert_eq!(again.count(), 0);
    }

    #[test]
    fn health_entry_set_and_clear() {
        let mut session = test_session();
        session.health.set("bp".parse().unwrap(), " 120/80 ");
        session.health.set(HealthField::Feelings, "fine");
        assert_eq!(session.health.blood_pressure.as_deref(), Some("120/80"));

        session.health.set(HealthField::Feelings, "");
        assert!(session.health.feelings.is_none());
        assert!("pulse".parse::<HealthField>().is_err());
    }
}
