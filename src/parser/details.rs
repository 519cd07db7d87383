//! Optional detail fields pulled out of an item's text
//!
//! Times, doses, durations, severities and onsets are split off the label
//! when they appear in a recognizable position. If nothing is left of the
//! label after splitting, the item keeps its full text and no details.

use crate::model::{Category, Exercise, Food, Supplement, Symptom, TimedItem};
use crate::text::clean_item;
use regex::Regex;
use std::sync::LazyLock;

const CLOCK: &str = r"\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)|\d{1,2}:\d{2}";

const SPAN: &str = r"(?:~|about|around)?\s*(?:\d+(?:\.\d+)?\s*(?:-\s*\d+(?:\.\d+)?\s*)?(?:minutes?|mins?|min|m|hours?|hrs?|hr|h)|an?\s+hour|half\s+an\s+hour)";

/// `8am eggs`, `7:30 pm - walk`, `14:05: lunch`
static LEADING_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^({CLOCK})\s*(?:[-–—:,]\s*|\s+)(.+)$")).unwrap()
});

/// `coffee (8am)`, `coffee @ 8am`, `coffee at 8:30`
static TRAILING_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(.+?)\s*(?:\(\s*|@\s*|\bat\s+)({CLOCK})\s*\)?$")).unwrap()
});

static TRAILING_DOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?)(?:\s+|\s*[(,-]\s*)(\d+(?:\.\d+)?\s*(?:mg|mcg|µg|g|iu|ml|capsules?|caps?|tablets?|tabs?|pills?|drops?|scoops?|softgels?))\s*\)?$",
    )
    .unwrap()
});

static TRAILING_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(.+?)(?:\s+|\s*[(,-]\s*)(?:for\s+)?({SPAN})\s*\)?$")).unwrap()
});

static LEADING_SEVERITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(mild|moderate|severe|slight|extreme)\s+(.+)$").unwrap());

static TRAILING_SEVERITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?)(?:\s+|\s*[(\[,-]\s*)(mild|moderate|severe|slight|extreme|\d{1,2}\s*/\s*10)\s*[)\]]?$",
    )
    .unwrap()
});

static TRAILING_ONSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(.+?)\s+({SPAN}(?:\s+(?:later|after(?:wards?)?))?)$"
    ))
    .unwrap()
});

static BARE_ONSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^{SPAN}(?:\s+(?:later|after(?:wards?)?))?$")).unwrap()
});

/// Split a clock time off the start or end of `text`.
pub fn split_time(text: &str) -> (Option<String>, String) {
    if let Some(caps) = LEADING_TIME.captures(text) {
        return (Some(caps[1].trim().to_string()), caps[2].to_string());
    }
    if let Some(caps) = TRAILING_TIME.captures(text) {
        return (Some(caps[2].trim().to_string()), caps[1].to_string());
    }
    (None, text.to_string())
}

fn split_trailing(re: &Regex, text: &str) -> (Option<String>, String) {
    match re.captures(text) {
        Some(caps) => (Some(caps[2].trim().to_string()), caps[1].to_string()),
        None => (None, text.to_string()),
    }
}

fn split_severity(text: &str) -> (Option<String>, String) {
    if let Some(caps) = LEADING_SEVERITY.captures(text) {
        return (Some(caps[1].to_lowercase()), caps[2].to_string());
    }
    match TRAILING_SEVERITY.captures(text) {
        Some(caps) => (Some(caps[2].replace(' ', "").to_lowercase()), caps[1].to_string()),
        None => (None, text.to_string()),
    }
}

/// Split a relative onset ("30min", "2 hours later") off the end of a
/// symptom. `separator` is the narrative word that followed the text, so
/// "migraine 30min" + "later" yields the onset "30min later".
pub fn split_onset(text: &str, separator: Option<&str>) -> (Option<String>, String) {
    let (onset, rest) = split_trailing(&TRAILING_ONSET, text);
    (onset.map(|o| with_relative_word(o, separator)), rest)
}

/// Whether the whole of `text` is an onset phrase, e.g. "30min".
pub fn bare_onset(text: &str, separator: Option<&str>) -> Option<String> {
    let trimmed = text.trim();
    if BARE_ONSET.is_match(trimmed) {
        Some(with_relative_word(trimmed.to_string(), separator))
    } else {
        None
    }
}

fn with_relative_word(onset: String, separator: Option<&str>) -> String {
    let lower = onset.to_lowercase();
    let already_relative = lower.ends_with("later") || lower.contains("after");
    match separator.map(|s| s.to_lowercase()) {
        Some(sep) if !already_relative && (sep == "later" || sep.starts_with("after")) => {
            format!("{} {}", onset, sep)
        }
        _ => onset,
    }
}

/// Build the variant for `category` from raw item text, splitting details.
pub fn build_item(category: Category, text: &str) -> TimedItem {
    let cleaned = clean_item(text);
    let (time, rest) = split_time(&cleaned);

    let item = match category {
        Category::Food => TimedItem::Food(Food { name: clean_item(&rest), time }),
        Category::Supplement => {
            let (dose, name) = split_trailing(&TRAILING_DOSE, &rest);
            TimedItem::Supplement(Supplement { name: clean_item(&name), dose, time })
        }
        Category::Exercise => {
            let (duration, activity) = split_trailing(&TRAILING_DURATION, &rest);
            TimedItem::Exercise(Exercise { activity: clean_item(&activity), duration, time })
        }
        Category::Symptom => {
            let mut symptom = build_symptom(&rest, None);
            symptom.time = time;
            TimedItem::Symptom(symptom)
        }
    };

    if item.label().is_empty() {
        TimedItem::with_label(category, cleaned)
    } else {
        item
    }
}

/// Build a symptom, splitting a leading time, severity and onset.
pub fn build_symptom(text: &str, separator: Option<&str>) -> Symptom {
    let cleaned = clean_item(text);
    let (time, rest) = split_time(&cleaned);
    let (onset, rest) = split_onset(&rest, separator);
    let (severity, rest) = split_severity(rest.trim());
    let description = clean_item(&rest);

    if description.is_empty() {
        return Symptom::new(cleaned);
    }
    Symptom { description, severity, onset, time }
}
