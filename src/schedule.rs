//! Daily dosing schedule derived from drug instructions.
//!
//! Each instruction is classified into a [`DosingPattern`], which carries a
//! fixed list of clock slots. [`generate_plan`] expands every drug's slots into
//! [`PlanEntry`] tasks and sorts them by time of day.

use crate::catalog::types::Drug;

/// Recognized dosing frequencies, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DosingPattern {
    /// Once a day, before a meal.
    OnceDailyBeforeMeal,
    /// Once a day, after breakfast.
    OnceDaily,
    TwiceDaily,
    EverySixToEightHours,
}

const ONCE_DAILY: &[&str] = &["每日一次", "once daily"];
const BEFORE_MEAL: &[&str] = &["餐前", "before meal"];
const TWICE_DAILY: &[&str] = &["一日两次", "早晚各一次", "twice daily", "morning and evening"];
const EVERY_SIX_TO_EIGHT_HOURS: &[&str] = &[
    "每6-8小时",
    "每6–8小时",
    "每6～8小时",
    "每6~8小时",
    "every 6-8 hours",
    "every 6–8 hours",
    "every 6~8 hours",
];

impl DosingPattern {
    /// Classify an instruction. First matching rule wins; `None` when no
    /// marker is present.
    pub fn classify(instruction: &str) -> Option<Self> {
        let text = instruction.to_ascii_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| text.contains(m));

        if has(ONCE_DAILY) {
            if has(BEFORE_MEAL) {
                Some(Self::OnceDailyBeforeMeal)
            } else {
                Some(Self::OnceDaily)
            }
        } else if has(TWICE_DAILY) {
            Some(Self::TwiceDaily)
        } else if has(EVERY_SIX_TO_EIGHT_HOURS) {
            Some(Self::EverySixToEightHours)
        } else {
            None
        }
    }

    /// Clock times (`HH:MM`) at which a dose is due.
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            Self::OnceDailyBeforeMeal => &["07:30"],
            Self::OnceDaily => &["08:30"],
            Self::TwiceDaily => &["08:30", "18:30"],
            Self::EverySixToEightHours => &["08:00", "15:00", "22:00"],
        }
    }
}

/// One scheduled task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// `HH:MM`, zero-padded, so string order is time order.
    pub time: String,
    pub task: String,
}

/// Build the day's plan for the given drugs.
///
/// Drugs whose instruction matches no pattern contribute nothing. Entries are
/// stable-sorted by time, so equal times keep drug order.
pub fn generate_plan(drugs: &[Drug]) -> Vec<PlanEntry> {
    let mut plan: Vec<PlanEntry> = drugs
        .iter()
        .filter_map(|drug| {
            let pattern = DosingPattern::classify(drug.instruction.as_deref().unwrap_or(""));
            if pattern.is_none() {
                tracing::debug!(drug = %drug.id, "no dosing pattern recognized");
            }
            pattern.map(|p| (drug, p))
        })
        .flat_map(|(drug, pattern)| {
            pattern.slots().iter().map(move |time| PlanEntry {
                time: time.to_string(),
                task: format!("take {}", drug.name),
            })
        })
        .collect();

    plan.sort_by(|a, b| a.time.cmp(&b.time));
    plan
}
