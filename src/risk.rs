//! Interaction risk evaluation for a personal drug list.
//!
//! A rule applies when every one of its drugs is in the personal list. At most
//! one finding is reported: the first applicable rule, unless a later
//! applicable rule is red, in which case the last red one wins.

use std::collections::HashSet;

use crate::catalog::types::InteractionRule;

/// Find the interaction rule to warn about, if any.
///
/// Lists with fewer than two drugs never produce a finding.
pub fn evaluate<'a, I, S>(personal_ids: I, rules: &'a [InteractionRule]) -> Option<&'a InteractionRule>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ids: HashSet<String> = personal_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    if ids.len() < 2 {
        return None;
    }

    let mut finding: Option<&InteractionRule> = None;
    for rule in rules.iter().filter(|rule| is_covered(&ids, rule)) {
        if finding.is_none() || rule.risk_level.is_max() {
            finding = Some(rule);
        }
    }

    if let Some(rule) = finding {
        tracing::debug!(rule = rule.id, level = %rule.risk_level, "interaction risk detected");
    }
    finding
}

/// `rule.drug_ids ⊆ ids`
fn is_covered(ids: &HashSet<String>, rule: &InteractionRule) -> bool {
    rule.drug_ids.iter().all(|id| ids.contains(id))
}
