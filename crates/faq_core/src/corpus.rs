use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::error::Result;
use crate::model::{FaqEntry, FaqRecord};
use crate::retrieval::{retrieve, top_k, ScoredMatch};
use crate::storage::load_faq_file;

/// Ordered FAQ entries with their token sets precomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqCorpus {
    entries: Vec<FaqEntry>,
}

impl FaqCorpus {
    pub fn from_records(records: impl IntoIterator<Item = FaqRecord>) -> Self {
        records.into_iter().map(FaqEntry::from).collect()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retrieve(&self, question: &str, k: usize) -> Vec<&FaqEntry> {
        retrieve(&self.entries, question, k)
    }

    pub fn top_k(&self, question: &str, k: usize) -> Vec<ScoredMatch<'_>> {
        top_k(&self.entries, question, k)
    }
}

impl FromIterator<FaqEntry> for FaqCorpus {
    fn from_iter<I: IntoIterator<Item = FaqEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Source of raw FAQ records. Missing objects and malformed documents are
/// reported here, never by the matcher.
pub trait CorpusLoader {
    fn load(&self) -> Result<Vec<FaqRecord>>;
}

/// Reads a local corpus file (`.json` array or `.jsonl`).
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusLoader for FileLoader {
    fn load(&self) -> Result<Vec<FaqRecord>> {
        debug!(path = %self.path.display(), "reading FAQ corpus");
        load_faq_file(&self.path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    records: Vec<FaqRecord>,
}

impl StaticLoader {
    pub fn new(records: Vec<FaqRecord>) -> Self {
        Self { records }
    }
}

impl CorpusLoader for StaticLoader {
    fn load(&self) -> Result<Vec<FaqRecord>> {
        Ok(self.records.clone())
    }
}

/// Populate-once corpus holder. A failed load leaves the cache empty so the
/// next call retries; a successful one is never refreshed.
#[derive(Debug, Default)]
pub struct CorpusCache {
    cell: OnceLock<FaqCorpus>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&FaqCorpus> {
        self.cell.get()
    }

    pub fn get_or_load<L>(&self, loader: &L) -> Result<&FaqCorpus>
    where
        L: CorpusLoader + ?Sized,
    {
        if let Some(corpus) = self.cell.get() {
            return Ok(corpus);
        }

        let corpus = FaqCorpus::from_records(loader.load()?);
        info!(entries = corpus.len(), "Loaded FAQ entries");
        // Concurrent first callers may both load; the first value stored wins.
        Ok(self.cell.get_or_init(|| corpus))
    }
}
