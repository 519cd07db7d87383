//! Where daily documents come from
//!
//! The orchestrator needs a stable id, a sortable label and a modification
//! marker per document. Discovery and storage are up to the source.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("document not found: {0}")]
    NotFound(String),
}

/// Identity and version of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    /// Display label; documents are processed in label order
    pub label: String,
    /// Changes whenever the content changes
    pub modification_marker: u64,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, modification_marker: u64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            modification_marker,
        }
    }
}

/// A document held in memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub reference: DocumentRef,
    pub text: String,
}

pub trait DocumentSource: Send + Sync {
    /// Candidate documents, in no particular order.
    fn list(&self) -> Result<Vec<DocumentRef>, SourceError>;

    fn read(&self, document: &DocumentRef) -> Result<String, SourceError>;
}

/// Documents supplied directly, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document whose id and label are both `label`.
    pub fn with_document(mut self, label: &str, modification_marker: u64, text: impl Into<String>) -> Self {
        self.insert(DocumentRef::new(label, label, modification_marker), text);
        self
    }

    /// Add or replace a document, keyed by id.
    pub fn insert(&mut self, reference: DocumentRef, text: impl Into<String>) {
        let text = text.into();
        match self.documents.iter_mut().find(|d| d.reference.id == reference.id) {
            Some(existing) => {
                existing.reference = reference;
                existing.text = text;
            }
            None => self.documents.push(Document { reference, text }),
        }
    }
}

impl DocumentSource for MemorySource {
    fn list(&self) -> Result<Vec<DocumentRef>, SourceError> {
        Ok(self.documents.iter().map(|d| d.reference.clone()).collect())
    }

    fn read(&self, document: &DocumentRef) -> Result<String, SourceError> {
        self.documents
            .iter()
            .find(|d| d.reference.id == document.id)
            .map(|d| d.text.clone())
            .ok_or_else(|| SourceError::NotFound(document.id.clone()))
    }
}

/// Markdown daily notes under a directory.
///
/// A file counts when its extension is `.md` and its stem matches the date
/// pattern. Hidden directories are skipped. The id is the path relative to
/// the root, the label is the stem and the marker is the modification time
/// in milliseconds.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    date_pattern: Regex,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, date_pattern: Regex) -> Self {
        Self {
            root: root.into(),
            date_pattern,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn modification_marker(path: &Path) -> Result<u64, SourceError> {
        let io_err = |source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).map_err(io_err)?;
        let millis = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Ok(millis)
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

impl DocumentSource for DirectorySource {
    fn list(&self) -> Result<Vec<DocumentRef>, SourceError> {
        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root).into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !self.date_pattern.is_match(stem) {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            documents.push(DocumentRef::new(id, stem, Self::modification_marker(path)?));
        }
        tracing::debug!(root = %self.root.display(), documents = documents.len(), "listed daily notes");
        Ok(documents)
    }

    fn read(&self, document: &DocumentRef) -> Result<String, SourceError> {
        let path = self.root.join(&document.id);
        std::fs::read_to_string(&path).map_err(|source| SourceError::Io { path, source })
    }
}
