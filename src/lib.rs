//! Healthlog: health journal extraction and trigger → symptom associations
//!
//! Turns free-form daily journal sections into typed health events (foods,
//! supplements, exercise, symptoms) and ranks which triggers co-occur with
//! which symptoms across days.
//!
//! # Pipeline
//!
//! - **Section extraction**: isolate the health-log section of a note
//! - **Extraction**: heuristic parser or external language-model service,
//!   behind the [`EntryExtractor`] strategy
//! - **Cache**: service results keyed by document identity and version
//! - **Association**: co-occurrence counts, percentages and timing evidence
//!
//! # Example
//!
//! ```
//! use healthlog::{analyze, parse_section, ParsedEntry, PercentageBasis};
//!
//! let items = parse_section("- Ate eggs, feta, and bread — migraine 30min later");
//! let entry = ParsedEntry::new("2024-03-01.md", "2024-03-01", items);
//! let associations = analyze(&[entry], PercentageBasis::default());
//! assert_eq!(associations.len(), 3);
//! ```

pub mod association;
pub mod batch;
pub mod cache;
pub mod config;
pub mod extract;
pub mod llm;
pub mod model;
pub mod parser;
pub mod text;

pub use association::{analyze, Association, Occurrence, PercentageBasis, Trigger, TriggerKind};
pub use batch::{
    BatchError, BatchOrchestrator, BatchOutcome, CancellationToken, DirectorySource, DocumentRef,
    DocumentSource, MemorySource,
};
pub use cache::{CacheStore, ExtractionCache, FileCacheStore, MemoryCacheStore};
pub use config::{ConfigError, Settings, Strategy};
pub use extract::{build_extractor, EntryExtractor, ExtractionError, HeuristicExtractor, LlmExtractor};
pub use model::{
    Category, Exercise, Food, HealthItems, Labeled, ParsedEntry, Supplement, Symptom, TimedItem,
};
pub use parser::parse_section;
pub use text::{clean_item, extract_section};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
