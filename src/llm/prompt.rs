//! Prompt construction for service extraction
//!
//! The output schema embedded in the prompt is derived from [`HealthItems`]
//! so it cannot drift from the types the response is parsed into.

use crate::model::HealthItems;
use std::sync::LazyLock;

static OUTPUT_SCHEMA: LazyLock<String> = LazyLock::new(|| {
    serde_json::to_string_pretty(&schemars::schema_for!(HealthItems)).unwrap_or_default()
});

const INSTRUCTIONS: &str = "\
You extract structured health events from a personal health journal entry.
Return a single JSON object with exactly four arrays: foods, supplements, exercise, symptoms.
- foods: things eaten or drunk. Field `name`, optional `time`.
- supplements: supplements or medication. Field `name`, optional `dose` and `time`.
- exercise: exercise and other behaviors such as sleep, stress or meditation. Field `activity`, optional `duration` and `time`.
- symptoms: anything felt or noticed. Field `description`, optional `severity`, `onset` (relative timing such as \"30min later\") and `time`.
Use short labels taken from the text. Do not invent events. Use an empty array for a category with nothing in it.
Respond with JSON only.";

/// JSON schema of the expected model output, generated from the item types.
pub fn output_schema() -> &'static str {
    &OUTPUT_SCHEMA
}

/// Prompt for one health-log section.
pub fn build_prompt(section: &str, date: &str) -> String {
    format!(
        "{INSTRUCTIONS}\n\nJSON schema:\n{schema}\n\nJournal date: {date}\nJournal entry:\n\"\"\"\n{section}\n\"\"\"\n",
        schema = output_schema(),
    )
}
