//! Live extraction against a running Ollama instance.
//!
//! Run with: `cargo test --test llm_live --features real_llm -- --nocapture`
//!
//! Uses `HEALTHLOG_ENDPOINT` and `HEALTHLOG_MODEL` when set.

#![cfg(feature = "real_llm")]

use healthlog::llm::OllamaClient;
use healthlog::{EntryExtractor, LlmExtractor, Settings};
use std::sync::Arc;

#[tokio::test]
async fn extracts_narrative_entry() {
    let defaults = Settings::default().llm;
    let endpoint = std::env::var("HEALTHLOG_ENDPOINT").unwrap_or(defaults.endpoint);
    let model = std::env::var("HEALTHLOG_MODEL").unwrap_or(defaults.model);

    let client = OllamaClient::new(&endpoint, defaults.timeout_secs).unwrap();
    let extractor = LlmExtractor::new(Arc::new(client), model);

    let items = extractor
        .extract(
            "- Ate eggs, feta, and bread — migraine 30min later\n- Magnesium 400mg at 9pm",
            "2024-03-01",
        )
        .await
        .unwrap();
    println!("{}", serde_json::to_string_pretty(&items).unwrap());

    let foods: Vec<_> = items.foods.iter().map(|f| f.name.to_lowercase()).collect();
    assert!(foods.iter().any(|f| f.contains("egg")), "foods: {foods:?}");
    assert!(
        items.symptoms.iter().any(|s| s.description.to_lowercase().contains("migraine")),
        "symptoms: {:?}",
        items.symptoms
    );
}
