use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::EngineConfig;
use crate::engine::SourceEntry;
use crate::error::{NeedlexError, Result};
use crate::index::WordIndex;
use crate::models::{EngineStats, SearchResults, SourceData, WordRecord};
use crate::search::planner;
use crate::tokenizer::scan_words;

/// Registry and index, guarded together by one reader/writer lock.
///
/// Ingest mutates both under the write lock; every read operation takes the
/// read lock, so anything a reader observes was fully published by a
/// completed ingest.
pub(crate) struct EngineState {
    pub(crate) sources: HashMap<Arc<str>, Arc<SourceEntry>>,
    pub(crate) index: WordIndex,
}

/// In-process, multi-source exact-substring search engine.
///
/// Callers register named sources once; `search` then answers verbatim
/// queries with per-source character offsets, combining word-index candidate
/// lookup with full-scan KMP verification. The engine is safe to share
/// across threads.
pub struct SearchEngine {
    config: EngineConfig,
    state: RwLock<EngineState>,
    query_cache: QueryCache,
    scan_pool: rayon::ThreadPool,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let scan_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.scan_threads)
            .thread_name(|i| format!("needlex-scan-{i}"))
            .build()
            .map_err(|err| NeedlexError::Internal(format!("failed to build scan pool: {err}")))?;
        Ok(Self {
            query_cache: QueryCache::new(config.query_cache_capacity),
            state: RwLock::new(EngineState {
                sources: HashMap::new(),
                index: WordIndex::new(),
            }),
            config,
            scan_pool,
        })
    }

    /// Register a source under a unique name.
    ///
    /// Holds the write lock for the whole ingest. Tokenization is staged
    /// into a local map and merged into the index only after the source
    /// parsed cleanly, so a failed ingest registers nothing and leaves the
    /// index untouched.
    pub fn add_source(&self, name: &str, data: SourceData) -> Result<()> {
        let byte_len = data.byte_len()?;
        let mut state = self.state.write();
        if state.sources.contains_key(name) {
            return Err(NeedlexError::DuplicateSource(name.to_string()));
        }
        if byte_len == 0 {
            return Err(NeedlexError::EmptySource(name.to_string()));
        }
        let name: Arc<str> = Arc::from(name);
        let entry = Arc::new(SourceEntry::new(
            name.clone(),
            data,
            byte_len,
            &self.config,
        ));
        if entry.can_build_index() {
            let mut staged: HashMap<u32, Vec<WordRecord>> = HashMap::new();
            let mut reader = entry.char_reader()?;
            scan_words(&name, reader.as_mut(), |record| {
                staged.entry(record.word_hash).or_default().push(record);
            })?;
            state.index.merge(staged);
        }
        tracing::info!(
            source = %name,
            bytes = byte_len,
            indexed = entry.can_build_index(),
            loaded = entry.can_load_content(),
            "registered source"
        );
        state.sources.insert(name, entry);
        // invalidate while still write-locked, so no reader can refill the
        // cache with results computed against the pre-insert state
        self.query_cache.invalidate_all();
        Ok(())
    }

    /// Find all occurrences of `query` in every registered source.
    ///
    /// Returns per-source ascending character offsets; sources without
    /// matches are omitted. Queries shorter than three characters match
    /// nothing.
    pub fn search(&self, query: &str) -> Result<SearchResults> {
        if query.chars().count() < 3 {
            return Ok(SearchResults::new());
        }
        let state = self.state.read();
        if let Some(cached) = self.query_cache.get(query) {
            return Ok((*cached).clone());
        }
        let results = planner::execute(query, &state, &self.config, &self.scan_pool)?;
        self.query_cache.put(query, Arc::new(results.clone()));
        let total: usize = results.values().map(|positions| positions.len()).sum();
        tracing::debug!(query, matches = total, "search completed");
        Ok(results)
    }

    /// Character range `[from, from + len)` of a source, clamped to its
    /// content; `None` when the source is unknown
    pub fn get_slice(&self, name: &str, from: i64, len: u64) -> Result<Option<String>> {
        let state = self.state.read();
        match state.sources.get(name) {
            Some(entry) => Ok(Some(entry.slice(from, len)?)),
            None => Ok(None),
        }
    }

    /// Raw byte stream over a source; `None` when the source is unknown
    pub fn get_source(&self, name: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let state = self.state.read();
        match state.sources.get(name) {
            Some(entry) => Ok(Some(entry.byte_stream()?)),
            None => Ok(None),
        }
    }

    /// Names of all registered sources, sorted
    pub fn source_names(&self) -> Vec<String> {
        let state = self.state.read();
        let mut names: Vec<String> = state.sources.keys().map(|name| name.to_string()).collect();
        names.sort();
        names
    }

    /// Drop every soft cache: per-source decoded content and memoized query
    /// results. Subsequent reads re-materialize transparently.
    pub fn trim_caches(&self) {
        let state = self.state.read();
        for entry in state.sources.values() {
            entry.release_content();
        }
        self.query_cache.invalidate_all();
    }

    /// Point-in-time statistics
    pub fn stats(&self) -> EngineStats {
        let state = self.state.read();
        EngineStats {
            source_count: state.sources.len(),
            indexed_sources: state
                .sources
                .values()
                .filter(|entry| entry.can_build_index())
                .count(),
            loaded_sources: state
                .sources
                .values()
                .filter(|entry| entry.can_load_content())
                .count(),
            record_count: state.index.record_count(),
            cache: self.query_cache.stats(),
        }
    }
}
