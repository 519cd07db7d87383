//! Extraction result cache
//!
//! A versioned container of per-document records, persisted as one JSON
//! blob through a [`CacheStore`].

mod extraction;
mod store;

pub use extraction::{CacheContainer, CacheRecord, ExtractionCache, RecordKey, CACHE_KEY, CACHE_VERSION};
pub use store::{CacheError, CacheResult, CacheStore, FileCacheStore, MemoryCacheStore};
