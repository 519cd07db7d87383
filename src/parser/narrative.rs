//! Narrative lines: an action followed by its outcome
//!
//! "Ate eggs, feta, and bread — migraine 30min later" is split on dashes and
//! temporal words into parts. The first part names what was eaten or done;
//! the later parts are checked for symptoms.

use super::details::{bare_onset, build_symptom, split_time};
use super::keywords::{has_narrative_symptom, starts_with_behavior_verb, strip_food_verb};
use crate::model::{Exercise, Food, HealthItems, TimedItem};
use crate::text::clean_item;
use regex::Regex;
use std::sync::LazyLock;

/// Dashes (em, en, or 1–3 spaced hyphens) and temporal/causal words.
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*[—–]\s*|\s+-{1,3}\s+|\b(?:afterwards?|after|later|then|followed\s+by|resulting\s+in|caused|led\s+to)\b",
    )
    .unwrap()
});

static AND_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

static DETERMINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:a|an|the|some)\s+").unwrap());

/// A piece of a narrative line and the separator that ended it.
#[derive(Debug, PartialEq)]
struct Part<'a> {
    text: &'a str,
    separator: Option<&'a str>,
}

fn split_parts(text: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in SEPARATOR.find_iter(text) {
        parts.push(Part {
            text: text[last..m.start()].trim(),
            separator: Some(m.as_str().trim()),
        });
        last = m.end();
    }
    parts.push(Part {
        text: text[last..].trim(),
        separator: None,
    });
    parts
}

/// Split a food list like "eggs, feta, and bread" into cleaned names.
pub fn extract_item_list(text: &str) -> Vec<String> {
    AND_WORD
        .replace_all(text, ",")
        .split(',')
        .map(|piece| {
            let cleaned = clean_item(piece);
            clean_item(&DETERMINER.replace(&cleaned, ""))
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Parse a narrative line.
///
/// Returns `None` unless a food or behavior was found and the line either
/// names a symptom or opened with a food verb. Symptom words inside the food
/// list ("had pizza and a sore throat") become symptoms. A line that only
/// mentions an activity is left to the other strategies.
pub fn parse_narrative(text: &str) -> Option<HealthItems> {
    let parts = split_parts(text);
    let first = parts.first()?;

    let mut items = HealthItems::new();
    let (time, action) = split_time(&clean_item(first.text));

    let mut found_trigger = false;
    let mut found_symptom = false;
    let mut food_verb = false;
    if let Some(rest) = strip_food_verb(&action) {
        for name in extract_item_list(rest) {
            // "Had a headache" names a symptom, not a meal
            if has_narrative_symptom(&name) {
                found_symptom |= items.push(TimedItem::Symptom(build_symptom(&name, None)));
            } else {
                food_verb = true;
                found_trigger |= items.push(TimedItem::Food(Food { name, time: time.clone() }));
            }
        }
    }
    if starts_with_behavior_verb(&action) {
        found_trigger |= items.push(TimedItem::Exercise(Exercise {
            activity: action.clone(),
            duration: None,
            time: time.clone(),
        }));
    }

    let mut pending_onset: Option<String> = None;
    for part in parts.iter().skip(1) {
        if part.text.is_empty() {
            continue;
        }
        if has_narrative_symptom(part.text) {
            let mut symptom = build_symptom(part.text, part.separator);
            if symptom.onset.is_none() {
                symptom.onset = pending_onset.take();
            }
            found_symptom |= items.push(TimedItem::Symptom(symptom));
        } else if let Some(onset) = bare_onset(part.text, part.separator) {
            // "— 30min later migraine": timing precedes the symptom
            pending_onset = Some(onset);
        }
    }

    if found_trigger && (found_symptom || food_verb) {
        Some(items)
    } else {
        None
    }
}
