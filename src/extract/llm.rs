//! Extraction delegated to the external service
//!
//! Builds the prompt, makes one generate call per section and parses the
//! model output leniently. Transport failures and unparseable output are
//! returned as errors; the orchestrator decides how to degrade.

use super::{EntryExtractor, ExtractionError};
use crate::llm::{build_prompt, parse_items, GenerateRequest, LlmClient};
use crate::model::HealthItems;
use async_trait::async_trait;
use std::sync::Arc;

pub struct LlmExtractor {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmExtractor {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EntryExtractor for LlmExtractor {
    fn id(&self) -> &str {
        "llm"
    }

    fn cacheable(&self) -> bool {
        true
    }

    fn fingerprint(&self) -> String {
        format!("llm:{}", self.model)
    }

    async fn extract(&self, section: &str, date: &str) -> Result<HealthItems, ExtractionError> {
        let request = GenerateRequest::json(&self.model, build_prompt(section, date));
        let reply = self.client.generate(request).await?;
        let items = parse_items(&reply.response)?;
        tracing::debug!(date, items = items.len(), "service extraction complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockClient};

    #[tokio::test]
    async fn parses_service_output() {
        let client = Arc::new(MockClient::responding(
            r#"{"foods":[{"name":"eggs"}],"symptoms":[{"description":"migraine","onset":"30min later"}]}"#,
        ));
        let extractor = LlmExtractor::new(client.clone(), "llama3.1");

        let items = extractor.extract("- Ate eggs — migraine", "2024-02-02").await.unwrap();
        assert_eq!(items.foods[0].name, "eggs");
        assert_eq!(items.symptoms[0].onset.as_deref(), Some("30min later"));
        assert_eq!(client.call_count(), 1);
        assert!(client.prompts()[0].contains("- Ate eggs — migraine"));
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let extractor = LlmExtractor::new(Arc::new(MockClient::failing_with_status(503)), "m");
        let err = extractor.extract("eggs", "2024-02-02").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Service(LlmError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn unparseable_output_is_an_error() {
        let extractor = LlmExtractor::new(Arc::new(MockClient::responding("sorry")), "m");
        let err = extractor.extract("eggs", "2024-02-02").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Service(LlmError::InvalidOutput(_))));
    }
}
