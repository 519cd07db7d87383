//! Batch extraction across a collection of daily documents

mod cancel;
mod orchestrator;
mod source;

pub use cancel::CancellationToken;
pub use orchestrator::{BatchError, BatchOrchestrator, BatchOutcome, BatchStats, ExtractionFailure};
pub use source::{DirectorySource, Document, DocumentRef, DocumentSource, MemorySource, SourceError};
