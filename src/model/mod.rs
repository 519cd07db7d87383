//! Typed health events extracted from journal text

mod entry;
mod item;

pub use entry::{HealthItems, ParsedEntry};
pub use item::{Category, Exercise, Food, Labeled, Supplement, Symptom, TimedItem};
