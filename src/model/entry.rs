//! Per-document collections of extracted items

use super::item::{Exercise, Food, Labeled, Supplement, Symptom, TimedItem};
use crate::text::clean_item;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four category lists extracted from one health-log section.
///
/// Labels are cleaned on insertion and de-duplicated by exact,
/// case-sensitive match within each list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HealthItems {
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub supplements: Vec<Supplement>,
    #[serde(default)]
    pub exercise: Vec<Exercise>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
}

impl HealthItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to its category list.
    ///
    /// Returns false if the cleaned label is empty or already present.
    pub fn push(&mut self, item: TimedItem) -> bool {
        match item {
            TimedItem::Food(i) => push_unique(&mut self.foods, i),
            TimedItem::Supplement(i) => push_unique(&mut self.supplements, i),
            TimedItem::Exercise(i) => push_unique(&mut self.exercise, i),
            TimedItem::Symptom(i) => push_unique(&mut self.symptoms, i),
        }
    }

    /// Move every item of `other` into `self`, keeping de-duplication.
    pub fn merge(&mut self, other: HealthItems) {
        for i in other.foods {
            push_unique(&mut self.foods, i);
        }
        for i in other.supplements {
            push_unique(&mut self.supplements, i);
        }
        for i in other.exercise {
            push_unique(&mut self.exercise, i);
        }
        for i in other.symptoms {
            push_unique(&mut self.symptoms, i);
        }
    }

    pub fn len(&self) -> usize {
        self.foods.len() + self.supplements.len() + self.exercise.len() + self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_unique<T: Labeled>(list: &mut Vec<T>, mut item: T) -> bool {
    let cleaned = clean_item(item.label());
    if cleaned.is_empty() || list.iter().any(|existing| existing.label() == cleaned) {
        return false;
    }
    *item.label_mut() = cleaned;
    list.push(item);
    true
}

/// The structured result for one daily document.
///
/// Built once per document per run and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub document_id: String,
    pub date: String,
    #[serde(flatten)]
    pub items: HealthItems,
}

impl ParsedEntry {
    pub fn new(document_id: impl Into<String>, date: impl Into<String>, items: HealthItems) -> Self {
        Self {
            document_id: document_id.into(),
            date: date.into(),
            items,
        }
    }

    /// True when nothing was extracted in any category.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
