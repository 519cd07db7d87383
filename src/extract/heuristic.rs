//! Rule-based extraction

use super::{EntryExtractor, ExtractionError};
use crate::model::HealthItems;
use crate::parser::parse_section;
use async_trait::async_trait;

/// Local rule-based extraction.
#[derive(Debug, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EntryExtractor for HeuristicExtractor {
    fn id(&self) -> &str {
        "heuristic"
    }

    fn cacheable(&self) -> bool {
        false
    }

    async fn extract(&self, section: &str, _date: &str) -> Result<HealthItems, ExtractionError> {
        Ok(parse_section(section))
    }
}
