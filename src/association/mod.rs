//! Trigger → symptom association analysis
//!
//! Every (trigger, symptom) pair that appears in the same entry counts as one
//! co-occurrence. Counts are aggregated across entries, each trigger's
//! associations get a percentage relative to a per-trigger denominator, and
//! the result is ranked by count.

mod lag;

pub use lag::{parse_clock, time_lag};

use crate::model::{Labeled, ParsedEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Food,
    Supplement,
    Exercise,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    pub name: String,
}

/// Evidence for one co-occurrence: the entry it came from and any timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptom_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_lag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub trigger: Trigger,
    pub symptom: String,
    pub occurrences: Vec<Occurrence>,
    /// Number of entries where the pair co-occurred
    pub total_count: usize,
    pub percentage: f64,
}

/// Denominator for an association's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageBasis {
    /// The trigger's most frequent symptom anchors 100%.
    #[default]
    MaxCoOccurrence,
    /// Share of the entries in which the trigger appears.
    TriggerEntries,
}

struct TriggerMention<'a> {
    kind: TriggerKind,
    name: &'a str,
    time: Option<&'a str>,
}

fn triggers_of(entry: &ParsedEntry) -> Vec<TriggerMention<'_>> {
    fn mentions<'a, T: Labeled>(kind: TriggerKind, list: &'a [T]) -> impl Iterator<Item = TriggerMention<'a>> {
        list.iter().map(move |item| TriggerMention {
            kind,
            name: item.label(),
            time: item.time(),
        })
    }
    let items = &entry.items;
    mentions(TriggerKind::Food, &items.foods)
        .chain(mentions(TriggerKind::Supplement, &items.supplements))
        .chain(mentions(TriggerKind::Exercise, &items.exercise))
        .collect()
}

/// Aggregate entries into ranked associations.
///
/// Ordering is by `total_count` descending; ties keep first-seen order.
pub fn analyze(entries: &[ParsedEntry], basis: PercentageBasis) -> Vec<Association> {
    let mut arena: Vec<Association> = Vec::new();
    let mut index: HashMap<(TriggerKind, &str, &str), usize> = HashMap::new();
    let mut trigger_entries: HashMap<(TriggerKind, &str), usize> = HashMap::new();

    for entry in entries {
        let triggers = triggers_of(entry);
        for trigger in &triggers {
            *trigger_entries.entry((trigger.kind, trigger.name)).or_default() += 1;
        }

        for trigger in &triggers {
            for symptom in &entry.items.symptoms {
                let key = (trigger.kind, trigger.name, symptom.description.as_str());
                let slot = *index.entry(key).or_insert_with(|| {
                    arena.push(Association {
                        trigger: Trigger {
                            kind: trigger.kind,
                            name: trigger.name.to_string(),
                        },
                        symptom: symptom.description.clone(),
                        occurrences: Vec::new(),
                        total_count: 0,
                        percentage: 0.0,
                    });
                    arena.len() - 1
                });

                let association = &mut arena[slot];
                association.total_count += 1;
                association.occurrences.push(Occurrence {
                    date: entry.date.clone(),
                    trigger_time: trigger.time.map(str::to_string),
                    symptom_time: symptom.time.clone(),
                    time_lag: time_lag(trigger.time, symptom.time.as_deref(), symptom.onset.as_deref()),
                });
            }
        }
    }

    let mut max_count: HashMap<(TriggerKind, &str), usize> = HashMap::new();
    for association in &arena {
        let max = max_count
            .entry((association.trigger.kind, association.trigger.name.as_str()))
            .or_default();
        *max = (*max).max(association.total_count);
    }

    let denominators: Vec<usize> = arena
        .iter()
        .map(|a| {
            let key = (a.trigger.kind, a.trigger.name.as_str());
            match basis {
                PercentageBasis::MaxCoOccurrence => max_count.get(&key).copied(),
                PercentageBasis::TriggerEntries => trigger_entries.get(&key).copied(),
            }
            .unwrap_or(a.total_count)
            .max(1)
        })
        .collect();

    for (association, denominator) in arena.iter_mut().zip(denominators) {
        association.percentage = association.total_count as f64 / denominator as f64 * 100.0;
    }

    arena.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    tracing::debug!(entries = entries.len(), associations = arena.len(), "association analysis complete");
    arena
}
