//! Keyword vocabularies for categorizing free text
//!
//! Keywords match at the start of a word ("bloat" matches "bloating",
//! "itch" does not match "kitchen"). `ache` also matches after a body part
//! ("backache", "toothache") but not inside "peaches".

use crate::model::Category;
use regex::Regex;
use std::sync::LazyLock;

/// Symptom vocabulary used for the outcome parts of narrative lines.
pub const NARRATIVE_SYMPTOM_KEYWORDS: &[&str] = &[
    "pain", "ache", "nausea", "nauseous", "tired", "fatigue", "bloat", "cramp", "rash", "itch",
    "headache", "migraine", "dizzy", "dizziness", "swelling", "sore", "throat", "reflux",
    "discomfort", "malaise", "joint", "stomach", "acid", "sick", "ill",
];

/// Extra symptom words used by the keyword fallback on top of the
/// narrative vocabulary.
const EXTRA_SYMPTOM_KEYWORDS: &[&str] = &[
    "itching", "itchy", "scratchy", "hoarse", "strep", "hurt", "suffer", "nasty",
];

static NARRATIVE_SYMPTOM: LazyLock<Regex> =
    LazyLock::new(|| keyword_regex(NARRATIVE_SYMPTOM_KEYWORDS.iter().copied()));

static FALLBACK_SYMPTOM: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(
        NARRATIVE_SYMPTOM_KEYWORDS
            .iter()
            .chain(EXTRA_SYMPTOM_KEYWORDS.iter())
            .copied(),
    )
});

/// Behavior and exercise words, with their common inflections.
static BEHAVIOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:exercis(?:e|es|ed|ing)|walk(?:s|ed|ing)?|run(?:s|ning)?|ran|sleep(?:s|ing)?|slept|stress(?:ed|ful)?|anxiety|anxious|workouts?|worked\s+out|meditat(?:e|ed|ing|ion)|yoga|climb(?:s|ed|ing)?|lift(?:s|ed|ing)?|hiit|cycl(?:e|ed|ing)|swim(?:s|ming)?|swam)\b",
    )
    .unwrap()
});

/// Words that open a food narrative: "Ate eggs and toast".
static FOOD_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:ate|had|consumed|drank|eating|drinking|ingested)\b\s*(.*)$").unwrap()
});

/// Words that open a behavior narrative: "Ran 5k".
static BEHAVIOR_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:exercised|worked\s+out|slept|ran|walked|meditated|yoga|stressed|climbed|hiit|lifted|cycled|swam)\b",
    )
    .unwrap()
});

fn keyword_regex<'a>(words: impl Iterator<Item = &'a str>) -> Regex {
    let alternatives: Vec<String> = words
        .map(|w| {
            if w == "ache" {
                r"(?:\b|head|back|stomach|tummy|belly|tooth|ear)ache".to_string()
            } else {
                format!(r"\b{}", regex::escape(w))
            }
        })
        .collect();
    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).unwrap()
}

/// Whether `text` mentions a symptom from the narrative vocabulary.
pub fn has_narrative_symptom(text: &str) -> bool {
    NARRATIVE_SYMPTOM.is_match(text)
}

/// If `text` starts with a food verb, return what follows it.
pub fn strip_food_verb(text: &str) -> Option<&str> {
    FOOD_VERB
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn starts_with_behavior_verb(text: &str) -> bool {
    BEHAVIOR_VERB.is_match(text)
}

/// Closed-world fallback: symptom words, then behavior words, else food.
pub fn categorize(text: &str) -> Category {
    if FALLBACK_SYMPTOM.is_match(text) {
        Category::Symptom
    } else if BEHAVIOR.is_match(text) {
        Category::Exercise
    } else {
        Category::Food
    }
}
