//! Versioned per-document extraction records

use super::store::{CacheResult, CacheStore};
use crate::model::ParsedEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Schema version of the persisted container. Bump when the record or
/// entry shape changes.
pub const CACHE_VERSION: u32 = 2;

/// Store key the container is persisted under.
pub const CACHE_KEY: &str = "extraction-cache";

/// A cached extraction for one document version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub document_id: String,
    pub modification_marker: u64,
    /// Fingerprint of the extractor that produced `parsed`
    pub extractor: String,
    /// Section heading the parse was scoped to
    pub heading: String,
    pub parsed: ParsedEntry,
}

impl CacheRecord {
    fn matches(&self, key: &RecordKey<'_>) -> bool {
        self.modification_marker == key.modification_marker
            && self.extractor == key.extractor
            && self.heading == key.heading
    }
}

/// What a cached parse must agree on to be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKey<'a> {
    pub document_id: &'a str,
    pub modification_marker: u64,
    pub extractor: &'a str,
    pub heading: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheContainer {
    pub version: u32,
    pub entries: BTreeMap<String, CacheRecord>,
}

impl Default for CacheContainer {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// In-memory view of the persisted cache.
///
/// Loaded once, read and overwritten by document id during a run, and
/// written back with [`persist`](Self::persist).
pub struct ExtractionCache {
    store: Arc<dyn CacheStore>,
    container: CacheContainer,
    dirty: bool,
}

impl ExtractionCache {
    /// Load the container from `store`.
    ///
    /// A missing, unreadable, corrupt or outdated container yields an empty
    /// cache.
    pub fn load(store: Arc<dyn CacheStore>) -> Self {
        let (container, dirty) = match store.read(CACHE_KEY) {
            Ok(Some(bytes)) => match decode(&bytes) {
                Some(container) => {
                    tracing::debug!(entries = container.entries.len(), "loaded extraction cache");
                    (container, false)
                }
                None => (CacheContainer::default(), true),
            },
            Ok(None) => (CacheContainer::default(), false),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read extraction cache, starting empty");
                (CacheContainer::default(), false)
            }
        };
        Self {
            store,
            container,
            dirty,
        }
    }

    /// The cached parse for `key.document_id`, if it was made from the same
    /// document version by the same extractor under the same heading.
    pub fn get(&self, key: &RecordKey<'_>) -> Option<&ParsedEntry> {
        self.container
            .entries
            .get(key.document_id)
            .filter(|record| record.matches(key))
            .map(|record| &record.parsed)
    }

    /// Store `parsed`, replacing any record for the same document.
    pub fn insert(&mut self, key: &RecordKey<'_>, parsed: ParsedEntry) {
        self.container.entries.insert(
            key.document_id.to_string(),
            CacheRecord {
                document_id: key.document_id.to_string(),
                modification_marker: key.modification_marker,
                extractor: key.extractor.to_string(),
                heading: key.heading.to_string(),
                parsed,
            },
        );
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.container.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.entries.is_empty()
    }

    pub fn container(&self) -> &CacheContainer {
        &self.container
    }

    /// Write the container back if anything changed.
    ///
    /// Failures are logged and reported as `false`; they never abort a run.
    pub fn persist(&mut self) -> bool {
        if !self.dirty {
            return true;
        }
        match self.write() {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!(entries = self.len(), "persisted extraction cache");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot persist extraction cache");
                false
            }
        }
    }

    fn write(&self) -> CacheResult<()> {
        let bytes = serde_json::to_vec(&self.container)?;
        self.store.write(CACHE_KEY, &bytes)
    }

    /// Delete the persisted container.
    pub fn clear(store: &dyn CacheStore) -> CacheResult<()> {
        store.remove(CACHE_KEY)
    }
}

fn decode(bytes: &[u8]) -> Option<CacheContainer> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "extraction cache is corrupt, rebuilding");
            return None;
        }
    };

    let version = value.get("version").and_then(serde_json::Value::as_u64);
    if version != Some(u64::from(CACHE_VERSION)) {
        tracing::info!(
            found = ?version,
            expected = CACHE_VERSION,
            "extraction cache version changed, rebuilding"
        );
        return None;
    }

    match serde_json::from_value(value) {
        Ok(container) => Some(container),
        Err(e) => {
            tracing::warn!(error = %e, "extraction cache does not match schema, rebuilding");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, MemoryCacheStore};
    use crate::model::{Food, HealthItems, TimedItem};
    use std::io;

    fn entry(id: &str, food: &str) -> ParsedEntry {
        let mut items = HealthItems::new();
        items.push(TimedItem::Food(Food::new(food)));
        ParsedEntry::new(id, "2024-01-01", items)
    }

    fn key(id: &str, marker: u64) -> RecordKey<'_> {
        RecordKey {
            document_id: id,
            modification_marker: marker,
            extractor: "llm:llama3.1",
            heading: "Health Log",
        }
    }

    fn record(id: &str, marker: u64, food: &str) -> CacheRecord {
        CacheRecord {
            document_id: id.into(),
            modification_marker: marker,
            extractor: "llm:llama3.1".into(),
            heading: "Health Log".into(),
            parsed: entry(id, food),
        }
    }

    /// Every read and write fails, like an unreadable cache directory.
    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn read(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(CacheError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
        }

        fn write(&self, _key: &str, _bytes: &[u8]) -> CacheResult<()> {
            Err(CacheError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
        }

        fn remove(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
        }
    }

    #[test]
    fn persist_then_load() {
        let store = Arc::new(MemoryCacheStore::new());
        let mut cache = ExtractionCache::load(store.clone());
        assert!(cache.is_empty());

        cache.insert(&key("2024-01-01.md", 42), entry("2024-01-01.md", "eggs"));
        assert!(cache.persist());

        let reloaded = ExtractionCache::load(store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get(&key("2024-01-01.md", 42)),
            Some(&entry("2024-01-01.md", "eggs"))
        );
    }

    #[test]
    fn stale_marker_misses() {
        let mut cache = ExtractionCache::load(Arc::new(MemoryCacheStore::new()));
        cache.insert(&key("a.md", 1), entry("a.md", "eggs"));
        assert!(cache.get(&key("a.md", 2)).is_none());
        assert!(cache.get(&key("b.md", 1)).is_none());

        cache.insert(&key("a.md", 2), entry("a.md", "toast"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("a.md", 2)).unwrap().items.foods[0].name, "toast");
    }

    #[test]
    fn other_extractor_or_heading_misses() {
        let mut cache = ExtractionCache::load(Arc::new(MemoryCacheStore::new()));
        cache.insert(&key("a.md", 1), entry("a.md", "eggs"));

        let other_model = RecordKey { extractor: "llm:mistral", ..key("a.md", 1) };
        assert!(cache.get(&other_model).is_none());
        let other_heading = RecordKey { heading: "Symptoms", ..key("a.md", 1) };
        assert!(cache.get(&other_heading).is_none());
        assert!(cache.get(&key("a.md", 1)).is_some());
    }

    #[test]
    fn version_mismatch_yields_empty_cache() {
        let store = Arc::new(MemoryCacheStore::new());
        let mut old = CacheContainer::default();
        old.version = CACHE_VERSION + 1;
        old.entries.insert("a.md".into(), record("a.md", 1, "eggs"));
        store.write(CACHE_KEY, &serde_json::to_vec(&old).unwrap()).unwrap();

        let cache = ExtractionCache::load(store.clone());
        assert!(cache.is_empty());
        assert!(cache.get(&key("a.md", 1)).is_none());
    }

    #[test]
    fn outdated_shape_with_old_version_is_not_a_parse_error() {
        let store = Arc::new(MemoryCacheStore::new());
        store
            .write(CACHE_KEY, br#"{"version": 1, "entries": {"a.md": {"mtime": 5}}}"#)
            .unwrap();
        assert!(ExtractionCache::load(store).is_empty());
    }

    #[test]
    fn invalidated_cache_is_rewritten_on_persist() {
        let store = Arc::new(MemoryCacheStore::new());
        store.write(CACHE_KEY, b"not json").unwrap();

        let mut cache = ExtractionCache::load(store.clone());
        assert!(cache.is_empty());
        assert!(cache.persist());

        let bytes = store.read(CACHE_KEY).unwrap().unwrap();
        let container: CacheContainer = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(container, CacheContainer::default());
    }

    #[test]
    fn unreadable_store_starts_empty() {
        let cache = ExtractionCache::load(Arc::new(BrokenStore));
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_write_is_reported_and_kept_dirty() {
        let mut cache = ExtractionCache::load(Arc::new(BrokenStore));
        assert!(cache.persist(), "nothing to write yet");

        cache.insert(&key("a.md", 1), entry("a.md", "eggs"));
        assert!(!cache.persist());
        assert!(!cache.persist());
        assert_eq!(cache.get(&key("a.md", 1)), Some(&entry("a.md", "eggs")));
    }

    #[test]
    fn record_uses_camel_case() {
        let json = serde_json::to_value(record("a.md", 7, "eggs")).unwrap();
        assert_eq!(json["documentId"], "a.md");
        assert_eq!(json["modificationMarker"], 7);
        assert_eq!(json["extractor"], "llm:llama3.1");
        assert_eq!(json["heading"], "Health Log");
        assert_eq!(json["parsed"]["foods"][0]["name"], "eggs");
    }

    #[test]
    fn clear_removes_persisted_container() {
        let store = MemoryCacheStore::new();
        store.write(CACHE_KEY, b"{}").unwrap();
        ExtractionCache::clear(&store).unwrap();
        assert!(!store.contains(CACHE_KEY));
    }
}
