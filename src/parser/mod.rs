//! Heuristic multi-format parser for health-log sections
//!
//! Each line goes through a fixed chain of strategies and the first one that
//! claims the line wins:
//!
//! 1. category label (`Foods:`, `**Symptoms**`, `### Exercise`)
//! 2. list item: narrative, then inline token (`- symptom: rash`), then the
//!    current category, then keyword categorization
//! 3. comma-separated line under the current category
//! 4. plain line: narrative, then the current category, then keywords
//!
//! The only context carried between lines is the current category, threaded
//! through a fold as [`LineState`].

mod details;
mod keywords;
mod narrative;

pub use details::{build_item, build_symptom};
pub use keywords::{categorize, NARRATIVE_SYMPTOM_KEYWORDS};
pub use narrative::{extract_item_list, parse_narrative};

use crate::model::{Category, HealthItems};
use crate::text::{clean_item, heading_of};
use regex::Regex;
use std::sync::LazyLock;

/// A category label line, optionally a heading, optionally emphasised.
static CATEGORY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:#{1,6}\s+)?[*_]{0,2}(foods?|behaviou?rs?|symptoms?|supplements?|exercises?|workouts?|activity|activities)[*_]{0,2}(\s*:[*_]{0,2}|\s+|$)(.*)$",
    )
    .unwrap()
});

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*+]|\d+[.)])\s+(?:\[[ xX]\]\s+)?(.*)$").unwrap()
});

/// `food: eggs`, `Symptoms - rash` at the start of a list item.
static INLINE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(foods?|behaviou?rs?|symptoms?|supplements?|exercises?|workouts?|activity|activities)\s*[:\-–—]\s*(.*)$",
    )
    .unwrap()
});

fn category_of_word(word: &str) -> Category {
    let word = word.to_lowercase();
    if word.starts_with("food") {
        Category::Food
    } else if word.starts_with("symptom") {
        Category::Symptom
    } else if word.starts_with("supplement") {
        Category::Supplement
    } else {
        Category::Exercise
    }
}

/// Whether a label word may be followed by content without a colon.
///
/// "Food poisoning" is read as a label with content; "Exercise bike" is not.
fn allows_space_separator(word: &str) -> bool {
    let word = word.to_lowercase();
    word.starts_with("food") || word.starts_with("behavio") || word.starts_with("symptom")
}

/// Parse a health-log section into de-duplicated category lists.
pub fn parse_section(text: &str) -> HealthItems {
    text.lines()
        .fold(LineState::default(), LineState::feed)
        .items
}

#[derive(Debug, Default)]
struct LineState {
    current: Option<Category>,
    items: HealthItems,
}

impl LineState {
    fn feed(mut self, line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return self;
        }

        if let Some((category, rest)) = category_label(line) {
            self.current = Some(category);
            self.dispatch_list(category, rest);
            return self;
        }

        // Headings that are not category labels carry no items.
        if heading_of(line).is_some() {
            return self;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            self.list_item(text);
            return self;
        }

        match self.current {
            Some(category) if line.contains(',') => self.dispatch_list(category, line),
            _ => self.plain_line(line),
        }
        self
    }

    fn list_item(&mut self, text: &str) {
        if let Some(found) = parse_narrative(text) {
            self.items.merge(found);
            return;
        }

        if let Some(caps) = INLINE_TOKEN.captures(text) {
            let category = category_of_word(&caps[1]);
            let rest = caps.get(2).map_or("", |m| m.as_str());
            if clean_item(rest).is_empty() {
                self.current = Some(category);
            } else {
                self.dispatch_list(category, rest);
            }
            return;
        }

        match self.current {
            Some(category) => self.dispatch(category, text),
            None => self.dispatch(categorize(&clean_item(text)), text),
        }
    }

    fn plain_line(&mut self, line: &str) {
        if let Some(found) = parse_narrative(line) {
            self.items.merge(found);
            return;
        }
        let category = self.current.unwrap_or_else(|| categorize(&clean_item(line)));
        self.dispatch(category, line);
    }

    fn dispatch(&mut self, category: Category, text: &str) {
        self.items.push(build_item(category, text));
    }

    fn dispatch_list(&mut self, category: Category, text: &str) {
        for piece in text.split(',') {
            self.dispatch(category, piece);
        }
    }
}

fn category_label(line: &str) -> Option<(Category, &str)> {
    let caps = CATEGORY_LABEL.captures(line)?;
    let word = caps.get(1)?.as_str();
    let separator = caps.get(2).map_or("", |m| m.as_str());
    let rest = caps.get(3).map_or("", |m| m.as_str()).trim();

    let has_colon = separator.contains(':');
    if !rest.is_empty() && !has_colon && !allows_space_separator(word) {
        return None;
    }
    Some((category_of_word(word), rest))
}
