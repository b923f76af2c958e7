//! Catalog type definitions.
//!
//! Defines [`Drug`] (a catalog entry), [`RiskLevel`] (rule severity) and
//! [`InteractionRule`] (a severity-tagged set of drugs), plus the import-file
//! record shapes [`DrugRecord`] and [`InteractionRecord`].

use serde::{Deserialize, Serialize};

/// A catalog drug, matching a `drugs` row with `side_effects` decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    /// Stable identifier assigned by the source data.
    pub id: String,
    /// Display name; also the literal the OCR matcher looks for.
    pub name: String,
    /// Free-text dosing instruction, e.g. `"once daily, before meal"`.
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
}

/// Severity of an interaction rule.
///
/// Stored and serialized as its lowercase name. Levels outside the known set
/// are kept verbatim in [`RiskLevel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    /// Caution: the combination needs monitoring.
    Yellow,
    /// Highest severity: the combination should be avoided.
    Red,
    Other(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Other(s) => s,
        }
    }

    pub fn is_max(&self) -> bool {
        matches!(self, Self::Red)
    }
}

impl From<String> for RiskLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.as_str().to_string()
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interaction rule with its member drug ids aggregated into a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRule {
    /// Auto-assigned by the store on import.
    pub id: i64,
    pub description: String,
    pub risk_level: RiskLevel,
    /// Member drug ids, in association insertion order.
    #[serde(alias = "drugs")]
    pub drug_ids: Vec<String>,
}

/// One entry of a drug import file.
///
/// Every field is optional: import performs no validation and leaves it to
/// the store's constraints to reject unusable rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrugRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub instruction: Option<String>,
    pub side_effects: Option<Vec<String>>,
}

/// One entry of an interaction import file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionRecord {
    pub description: Option<String>,
    pub risk_level: Option<String>,
    #[serde(default)]
    pub drugs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_round_trips_through_string() {
        assert_eq!(RiskLevel::from("red"), RiskLevel::Red);
        assert_eq!(RiskLevel::from("yellow"), RiskLevel::Yellow);
        assert_eq!(
            RiskLevel::from("orange"),
            RiskLevel::Other("orange".to_string())
        );
        assert_eq!(String::from(RiskLevel::Other("orange".into())), "orange");
    }

    #[test]
    fn only_red_is_max() {
        assert!(RiskLevel::Red.is_max());
        assert!(!RiskLevel::Yellow.is_max());
        assert!(!RiskLevel::Other("critical".into()).is_max());
    }

    #[test]
    fn interaction_rule_serializes_levels_as_strings() {
        let rule = InteractionRule {
            id: 7,
            description: "bleeding risk".into(),
            risk_level: RiskLevel::Red,
            drug_ids: vec!["a".into(), "b".into()],
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["risk_level"], "red");
        assert_eq!(json["drug_ids"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn interaction_rule_accepts_drugs_alias() {
        let rule: InteractionRule = serde_json::from_str(
            r#"{"id": 1, "description": "d", "risk_level": "yellow", "drugs": ["x", "y"]}"#,
        )
        .unwrap();
        assert_eq!(rule.drug_ids, vec!["x", "y"]);
        assert_eq!(rule.risk_level, RiskLevel::Yellow);
    }

    #[test]
    fn drug_record_tolerates_missing_fields() {
        let records: Vec<DrugRecord> =
            serde_json::from_str(r#"[{"id": "d1"}, {"name": "Aspirin"}]"#).unwrap();
        assert_eq!(records[0].id.as_deref(), Some("d1"));
        assert!(records[0].name.is_none());
        assert!(records[1].side_effects.is_none());
    }
}
