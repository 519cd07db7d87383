//! Item variants, one per category
//!
//! Each category names its label field differently (`name`, `activity`,
//! `description`), matching the field names of the extraction contract.
//! Code that only needs the label goes through [`Labeled`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four categories an item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Supplement,
    Exercise,
    Symptom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Supplement => "supplement",
            Category::Exercise => "exercise",
            Category::Symptom => "symptom",
        }
    }

    /// Whether items of this category can trigger a symptom.
    pub fn is_trigger(&self) -> bool {
        !matches!(self, Category::Symptom)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to the canonical label and time shared by every variant.
pub trait Labeled {
    fn label(&self) -> &str;

    fn label_mut(&mut self) -> &mut String;

    fn time(&self) -> Option<&str>;
}

/// Something eaten or drunk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Food {
    /// What was consumed, e.g. "eggs"
    pub name: String,
    /// Clock time of consumption, e.g. "8am"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// A supplement or medication taken.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Supplement {
    /// Supplement name, e.g. "magnesium"
    pub name: String,
    /// Amount taken, e.g. "400mg"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    /// Clock time taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// An exercise or other behavior (sleep, stress, meditation).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Exercise {
    /// What was done, e.g. "walked to work"
    pub activity: String,
    /// How long, e.g. "30 min"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Clock time started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// A symptom experienced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Symptom {
    /// The symptom, e.g. "migraine"
    pub description: String,
    /// Severity, e.g. "mild" or "7/10"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Relative timing after the trigger, e.g. "30min later"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset: Option<String>,
    /// Clock time noticed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Food {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), time: None }
    }
}

impl Supplement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

impl Exercise {
    pub fn new(activity: impl Into<String>) -> Self {
        Self { activity: activity.into(), ..Default::default() }
    }
}

impl Symptom {
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), ..Default::default() }
    }

    pub fn with_onset(mut self, onset: impl Into<String>) -> Self {
        self.onset = Some(onset.into());
        self
    }
}

macro_rules! impl_labeled {
    ($ty:ty, $field:ident) => {
        impl Labeled for $ty {
            fn label(&self) -> &str {
                &self.$field
            }

            fn label_mut(&mut self) -> &mut String {
                &mut self.$field
            }

            fn time(&self) -> Option<&str> {
                self.time.as_deref()
            }
        }
    };
}

impl_labeled!(Food, name);
impl_labeled!(Supplement, name);
impl_labeled!(Exercise, activity);
impl_labeled!(Symptom, description);

/// One mention of a health event, tagged by category.
///
/// An item belongs to exactly one category by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedItem {
    Food(Food),
    Supplement(Supplement),
    Exercise(Exercise),
    Symptom(Symptom),
}

impl TimedItem {
    pub fn category(&self) -> Category {
        match self {
            TimedItem::Food(_) => Category::Food,
            TimedItem::Supplement(_) => Category::Supplement,
            TimedItem::Exercise(_) => Category::Exercise,
            TimedItem::Symptom(_) => Category::Symptom,
        }
    }

    /// Wrap a bare label in the variant for `category`.
    pub fn with_label(category: Category, label: impl Into<String>) -> Self {
        match category {
            Category::Food => TimedItem::Food(Food::new(label)),
            Category::Supplement => TimedItem::Supplement(Supplement::new(label)),
            Category::Exercise => TimedItem::Exercise(Exercise::new(label)),
            Category::Symptom => TimedItem::Symptom(Symptom::new(label)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TimedItem::Food(i) => i.label(),
            TimedItem::Supplement(i) => i.label(),
            TimedItem::Exercise(i) => i.label(),
            TimedItem::Symptom(i) => i.label(),
        }
    }

    pub fn time(&self) -> Option<&str> {
        match self {
            TimedItem::Food(i) => i.time(),
            TimedItem::Supplement(i) => i.time(),
            TimedItem::Exercise(i) => i.time(),
            TimedItem::Symptom(i) => i.time(),
        }
    }
}
