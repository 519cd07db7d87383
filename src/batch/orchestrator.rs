//! Batch orchestrator
//!
//! Walks documents one at a time in label order: section extraction, cache
//! lookup, strategy extraction, empty-entry filtering. Association analysis
//! runs once over the collected entries.
//!
//! Failure policy:
//! - a failed extraction degrades to an empty entry and is reported in
//!   [`BatchOutcome::failures`]; it is not cached, so the next run retries
//! - a document that cannot be read aborts the run, after the cache has
//!   been persisted
//! - cancellation stops before the next document and returns what was
//!   collected so far

use super::cancel::CancellationToken;
use super::source::{DocumentRef, DocumentSource, SourceError};
use crate::association::{analyze, Association, PercentageBasis};
use crate::cache::{ExtractionCache, RecordKey};
use crate::extract::EntryExtractor;
use crate::model::{HealthItems, ParsedEntry};
use crate::text::extract_section;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("document source failed: {0}")]
    Source(#[from] SourceError),
}

/// A document whose extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionFailure {
    pub document_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Documents visited before the run ended
    pub documents: usize,
    pub cache_hits: usize,
    /// Documents sent to the extraction strategy
    pub extracted: usize,
    /// Documents without the configured heading
    pub missing_section: usize,
    /// Entries dropped because nothing was extracted
    pub empty_dropped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub entries: Vec<ParsedEntry>,
    pub associations: Vec<Association>,
    pub failures: Vec<ExtractionFailure>,
    pub cancelled: bool,
    pub stats: BatchStats,
}

pub struct BatchOrchestrator {
    extractor: Arc<dyn EntryExtractor>,
    cache: Option<ExtractionCache>,
    heading: String,
    basis: PercentageBasis,
}

impl BatchOrchestrator {
    pub fn new(extractor: Arc<dyn EntryExtractor>, heading: impl Into<String>) -> Self {
        Self {
            extractor,
            cache: None,
            heading: heading.into(),
            basis: PercentageBasis::default(),
        }
    }

    /// Use `cache` for strategies that are worth caching.
    pub fn with_cache(mut self, cache: ExtractionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_basis(mut self, basis: PercentageBasis) -> Self {
        self.basis = basis;
        self
    }

    pub fn cache(&self) -> Option<&ExtractionCache> {
        self.cache.as_ref()
    }

    /// Process every document of `source` and analyze the result.
    pub async fn run(
        &mut self,
        source: &dyn DocumentSource,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchError> {
        let mut documents = source.list()?;
        documents.sort_by(|a, b| a.label.cmp(&b.label));
        tracing::info!(
            documents = documents.len(),
            strategy = self.extractor.id(),
            "starting batch"
        );

        let mut outcome = BatchOutcome::default();
        for document in &documents {
            if cancel.is_cancelled() {
                tracing::info!(processed = outcome.stats.documents, "batch cancelled");
                outcome.cancelled = true;
                break;
            }
            outcome.stats.documents += 1;

            let text = match source.read(document) {
                Ok(text) => text,
                Err(e) => {
                    self.persist_cache();
                    return Err(e.into());
                }
            };

            let Some(section) = extract_section(&text, &self.heading) else {
                tracing::debug!(document = %document.id, heading = %self.heading, "no health log section");
                outcome.stats.missing_section += 1;
                continue;
            };

            let entry = self.entry_for(document, &section, &mut outcome).await;
            if entry.is_empty() {
                outcome.stats.empty_dropped += 1;
                continue;
            }
            outcome.entries.push(entry);
        }

        self.persist_cache();
        outcome.associations = analyze(&outcome.entries, self.basis);
        tracing::info!(
            entries = outcome.entries.len(),
            associations = outcome.associations.len(),
            failures = outcome.failures.len(),
            cache_hits = outcome.stats.cache_hits,
            "batch finished"
        );
        Ok(outcome)
    }

    async fn entry_for(
        &mut self,
        document: &DocumentRef,
        section: &str,
        outcome: &mut BatchOutcome,
    ) -> ParsedEntry {
        let cacheable = self.extractor.cacheable();
        let fingerprint = self.extractor.fingerprint();
        let key = RecordKey {
            document_id: &document.id,
            modification_marker: document.modification_marker,
            extractor: &fingerprint,
            heading: &self.heading,
        };
        if cacheable {
            let hit = self.cache.as_ref().and_then(|cache| cache.get(&key));
            if let Some(entry) = hit {
                tracing::debug!(document = %document.id, "cache hit");
                outcome.stats.cache_hits += 1;
                return entry.clone();
            }
        }

        outcome.stats.extracted += 1;
        match self.extractor.extract(section, &document.label).await {
            Ok(items) => {
                let entry = ParsedEntry::new(&document.id, &document.label, items);
                if let Some(cache) = self.cache.as_mut().filter(|_| cacheable) {
                    cache.insert(&key, entry.clone());
                }
                entry
            }
            Err(e) => {
                tracing::warn!(document = %document.id, error = %e, "extraction failed");
                outcome.failures.push(ExtractionFailure {
                    document_id: document.id.clone(),
                    message: e.to_string(),
                });
                ParsedEntry::new(&document.id, &document.label, HealthItems::new())
            }
        }
    }

    fn persist_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.persist();
        }
    }
}
