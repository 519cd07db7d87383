//! Extraction strategies
//!
//! Both strategies turn a health-log section into [`HealthItems`] through the
//! same [`EntryExtractor`] contract, so the orchestrator and the analyzer do
//! not care which one is configured.

mod heuristic;
mod llm;

pub use heuristic::HeuristicExtractor;
pub use llm::LlmExtractor;

use crate::config::{Settings, Strategy};
use crate::llm::{LlmError, OllamaClient};
use crate::model::HealthItems;
use async_trait::async_trait;
use std::sync::Arc;

/// Errors from an extraction strategy.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction service failed: {0}")]
    Service(#[from] LlmError),
}

/// The contract extraction strategies implement.
#[async_trait]
pub trait EntryExtractor: Send + Sync {
    /// Unique identifier for this strategy
    fn id(&self) -> &str;

    /// Whether results are worth caching by document identity.
    ///
    /// Cheap local strategies re-run every time.
    fn cacheable(&self) -> bool;

    /// Identifies everything that shapes this strategy's output, so cached
    /// results from a differently configured strategy are not reused.
    fn fingerprint(&self) -> String {
        self.id().to_string()
    }

    /// Extract items from one section. `date` is the document's date label.
    async fn extract(&self, section: &str, date: &str) -> Result<HealthItems, ExtractionError>;
}

/// Build the strategy selected in `settings`.
pub fn build_extractor(settings: &Settings) -> Result<Arc<dyn EntryExtractor>, ExtractionError> {
    match settings.strategy {
        Strategy::Heuristic => Ok(Arc::new(HeuristicExtractor::new())),
        Strategy::Llm => {
            let client = OllamaClient::new(&settings.llm.endpoint, settings.llm.timeout_secs)?;
            tracing::info!(
                endpoint = %settings.llm.endpoint,
                model = %settings.llm.model,
                "using extraction service"
            );
            Ok(Arc::new(LlmExtractor::new(Arc::new(client), settings.llm.model.clone())))
        }
    }
}
