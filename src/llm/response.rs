//! Lenient parsing of model output
//!
//! Models wrap JSON in prose or code fences and drift from the schema. A
//! category that is not an array becomes empty, items without a usable
//! label are skipped, and detail fields accept strings or numbers.

use super::client::LlmError;
use crate::model::{Category, Exercise, Food, HealthItems, Supplement, Symptom, TimedItem};
use serde_json::{Map, Value};

/// Pull a JSON object out of model text.
///
/// Tries a direct parse, then a fenced code block, then the span from the
/// first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Some(v) = parse_object(trimmed) {
        return Some(v);
    }

    let fenced = if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        after.find("```").map(|end| &after[..end])
    } else if let Some(start) = trimmed.find("```\n") {
        let after = &trimmed[start + 4..];
        after.find("```").map(|end| &after[..end])
    } else {
        None
    };
    if let Some(v) = fenced.and_then(|block| parse_object(block.trim())) {
        return Some(v);
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => parse_object(&trimmed[start..=end]),
        _ => None,
    }
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok().filter(Value::is_object)
}

/// Parse the model's `response` string into category lists.
///
/// Only an unparseable response is an error; schema drift degrades to
/// fewer items.
pub fn parse_items(response: &str) -> Result<HealthItems, LlmError> {
    let value = extract_json(response).ok_or_else(|| {
        let preview: String = response.chars().take(80).collect();
        LlmError::InvalidOutput(format!("no JSON object in model output: {preview:?}"))
    })?;

    let mut items = HealthItems::new();
    for (key, category) in [
        ("foods", Category::Food),
        ("supplements", Category::Supplement),
        ("exercise", Category::Exercise),
        ("symptoms", Category::Symptom),
    ] {
        let Some(Value::Array(list)) = value.get(key) else {
            continue;
        };
        for obj in list.iter().filter_map(Value::as_object) {
            if let Some(item) = item_from_object(category, obj) {
                items.push(item);
            }
        }
    }
    Ok(items)
}

fn item_from_object(category: Category, obj: &Map<String, Value>) -> Option<TimedItem> {
    let label_key = match category {
        Category::Food | Category::Supplement => "name",
        Category::Exercise => "activity",
        Category::Symptom => "description",
    };
    let label = scalar(obj, label_key).or_else(|| scalar(obj, "name"))?;
    let time = scalar(obj, "time");

    Some(match category {
        Category::Food => TimedItem::Food(Food { name: label, time }),
        Category::Supplement => TimedItem::Supplement(Supplement {
            name: label,
            dose: scalar(obj, "dose"),
            time,
        }),
        Category::Exercise => TimedItem::Exercise(Exercise {
            activity: label,
            duration: scalar(obj, "duration"),
            time,
        }),
        Category::Symptom => TimedItem::Symptom(Symptom {
            description: label,
            severity: scalar(obj, "severity"),
            onset: scalar(obj, "onset"),
            time,
        }),
    })
}

fn scalar(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_direct() {
        let v = extract_json(r#"{"foods": []}"#).unwrap();
        assert!(v.get("foods").is_some());
    }

    #[test]
    fn extract_json_from_fence_and_prose() {
        let fenced = "Here you go:\n```json\n{\"foods\": [{\"name\": \"rice\"}]}\n```";
        assert!(extract_json(fenced).is_some());

        let prose = "Sure! {\"symptoms\": []} Hope that helps.";
        assert!(extract_json(prose).is_some());

        assert!(extract_json("no json here").is_none());
        assert!(extract_json("[1, 2]").is_none());
    }

    #[test]
    fn parses_all_categories_with_details() {
        let response = r#"{
            "foods": [{"name": "eggs", "time": "8am"}],
            "supplements": [{"name": "Magnesium", "dose": 400}],
            "exercise": [{"activity": "ran", "duration": "30 min"}],
            "symptoms": [{"description": "migraine", "onset": "30min later", "severity": "7/10"}]
        }"#;
        let items = parse_items(response).unwrap();
        assert_eq!(items.foods, vec![Food { name: "eggs".into(), time: Some("8am".into()) }]);
        assert_eq!(items.supplements[0].dose.as_deref(), Some("400"));
        assert_eq!(items.exercise[0].duration.as_deref(), Some("30 min"));
        assert_eq!(items.symptoms[0].onset.as_deref(), Some("30min later"));
        assert_eq!(items.symptoms[0].severity.as_deref(), Some("7/10"));
    }

    #[test]
    fn schema_drift_degrades_per_category() {
        let response = r#"{
            "foods": "eggs",
            "supplements": [null, 3, {"dose": "5mg"}, {"name": ""}],
            "exercise": [{"name": "yoga"}],
            "symptoms": [{"description": "**bloating**"}, {"description": "bloating"}]
        }"#;
        let items = parse_items(response).unwrap();
        assert!(items.foods.is_empty());
        assert!(items.supplements.is_empty());
        assert_eq!(items.exercise[0].activity, "yoga");
        assert_eq!(items.symptoms.len(), 1);
        assert_eq!(items.symptoms[0].description, "bloating");
    }

    #[test]
    fn missing_categories_are_empty() {
        let items = parse_items("{}").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unparseable_output_is_an_error() {
        assert!(matches!(parse_items("I could not read that"), Err(LlmError::InvalidOutput(_))));
    }
}
