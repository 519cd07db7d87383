//! End-to-end runs over a journal directory on disk.

mod common;

use common::Journal;
use healthlog::cache::{CacheContainer, CACHE_KEY, CACHE_VERSION};
use healthlog::llm::MockClient;
use healthlog::{
    BatchOrchestrator, CancellationToken, DirectorySource, ExtractionCache, FileCacheStore,
    HeuristicExtractor, LlmExtractor, PercentageBasis, Settings, TriggerKind,
};
use std::path::Path;
use std::sync::Arc;

const SERVICE_JSON: &str = r#"```json
{"foods": [{"name": "coffee", "time": "8am"}], "symptoms": [{"description": "headache", "time": "9am"}]}
```"#;

fn source(journal: &Journal) -> DirectorySource {
    let settings = Settings::default();
    DirectorySource::new(journal.path(), settings.date_regex().unwrap())
}

fn service_orchestrator(client: Arc<MockClient>, cache_dir: &Path) -> BatchOrchestrator {
    let store = Arc::new(FileCacheStore::new(cache_dir));
    BatchOrchestrator::new(Arc::new(LlmExtractor::new(client, "test-model")), "Health Log")
        .with_cache(ExtractionCache::load(store))
}

#[tokio::test]
async fn heuristic_run_over_mixed_formats() {
    let journal = Journal::standard();
    let mut orchestrator = BatchOrchestrator::new(Arc::new(HeuristicExtractor::new()), "Health Log");
    let outcome = orchestrator
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();

    let dates: Vec<_> = outcome.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    assert_eq!(outcome.entries[2].document_id, "nested/2024-03-03.md");

    let first = &outcome.entries[0].items;
    assert_eq!(first.foods[0].name, "coffee");
    assert_eq!(first.foods[0].time.as_deref(), Some("8am"));
    assert_eq!(first.symptoms[0].severity.as_deref(), Some("mild"));
    assert_eq!(first.supplements[0].dose.as_deref(), Some("400mg"));
    assert_eq!(outcome.entries[1].items.exercise[0].duration.as_deref(), Some("30 min"));

    assert_eq!(outcome.stats.documents, 5);
    assert_eq!(outcome.stats.missing_section, 1);
    assert_eq!(outcome.stats.empty_dropped, 1);
    assert!(outcome.failures.is_empty());

    let top = &outcome.associations[0];
    assert_eq!(top.trigger.kind, TriggerKind::Food);
    assert_eq!(top.trigger.name, "coffee");
    assert_eq!(top.symptom, "headache");
    assert_eq!(top.total_count, 2);
    assert_eq!(top.percentage, 100.0);
    assert_eq!(top.occurrences[0].time_lag.as_deref(), Some("2h 0m"));

    let nausea = outcome
        .associations
        .iter()
        .find(|a| a.trigger.name == "coffee" && a.symptom == "nausea")
        .unwrap();
    assert_eq!(nausea.percentage, 50.0);
}

#[tokio::test]
async fn trigger_entries_basis() {
    let journal = Journal::standard();
    let mut orchestrator = BatchOrchestrator::new(Arc::new(HeuristicExtractor::new()), "Health Log")
        .with_basis(PercentageBasis::TriggerEntries);
    let outcome = orchestrator
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();

    let coffee_headache = &outcome.associations[0];
    assert_eq!(coffee_headache.total_count, 2);
    assert!((coffee_headache.percentage - 66.666).abs() < 0.01);
}

#[tokio::test]
async fn service_results_are_cached_on_disk() {
    let journal = Journal::standard();
    let cache_dir = tempfile::tempdir().unwrap();

    let client = Arc::new(MockClient::responding(SERVICE_JSON));
    let outcome = service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();
    // 03-04 has no section; every other daily note is sent
    assert_eq!(client.call_count(), 4);
    assert_eq!(outcome.entries.len(), 4);
    assert_eq!(outcome.associations[0].occurrences[0].time_lag.as_deref(), Some("1h 0m"));
    assert!(cache_dir.path().join(format!("{CACHE_KEY}.json")).exists());

    let client = Arc::new(MockClient::responding(SERVICE_JSON));
    let outcome = service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(client.call_count(), 0);
    assert_eq!(outcome.stats.cache_hits, 4);
    assert_eq!(outcome.entries.len(), 4);

    journal.touch("2024-03-02.md");
    let client = Arc::new(MockClient::responding(SERVICE_JSON));
    service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn outdated_cache_file_is_rebuilt() {
    let journal = Journal::standard();
    let cache_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        cache_dir.path().join(format!("{CACHE_KEY}.json")),
        format!(r#"{{"version": {}, "entries": {{}}}}"#, CACHE_VERSION + 1),
    )
    .unwrap();

    let client = Arc::new(MockClient::responding(SERVICE_JSON));
    service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(client.call_count(), 4);

    let bytes = std::fs::read(cache_dir.path().join(format!("{CACHE_KEY}.json"))).unwrap();
    let container: CacheContainer = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(container.version, CACHE_VERSION);
    assert_eq!(container.entries.len(), 4);
}

#[tokio::test]
async fn service_outage_degrades_every_note() {
    let journal = Journal::standard();
    let cache_dir = tempfile::tempdir().unwrap();
    let client = Arc::new(MockClient::unreachable());

    let outcome = service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.entries.is_empty());
    assert!(outcome.associations.is_empty());
    assert_eq!(outcome.failures.len(), 4);
    assert_eq!(outcome.stats.empty_dropped, 4);

    // Nothing was cached, so the next run retries every note
    let client = Arc::new(MockClient::responding(SERVICE_JSON));
    service_orchestrator(client.clone(), cache_dir.path())
        .run(&source(&journal), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(client.call_count(), 4);
}

#[tokio::test]
async fn settings_file_drives_the_run() {
    let journal = Journal::empty();
    journal.write("2024-04-01.md", "### Daily Health\n- Ate pizza — heartburn and bloating\n");
    let config = journal.write(
        "settings.yaml",
        "heading: daily health\npercentage_basis: trigger_entries\n",
    );

    let settings = Settings::load(Some(config.as_path())).unwrap();
    let extractor = healthlog::build_extractor(&settings).unwrap();
    let mut orchestrator = BatchOrchestrator::new(extractor, settings.heading.clone())
        .with_basis(settings.percentage_basis);
    let source = DirectorySource::new(journal.path(), settings.date_regex().unwrap());

    let outcome = orchestrator.run(&source, &CancellationToken::new()).await.unwrap();
    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].items.foods[0].name, "pizza");
    assert_eq!(outcome.entries[0].items.symptoms[0].description, "heartburn and bloating");
}
