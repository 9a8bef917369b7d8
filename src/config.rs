use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sources at most this many bytes long keep a decoded copy of their
    /// content cached in memory
    pub load_to_memory_limit: u64,
    /// Sources at most this many bytes long are tokenized into the word index
    pub build_index_limit: u64,
    /// Number of memoized query results; 0 disables the query cache
    pub query_cache_capacity: usize,
    /// Worker threads for parallel full scans
    pub scan_threads: usize,
    /// Buffer length, in characters, for streamed scans
    pub scan_buffer_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            load_to_memory_limit: 10_000_000,
            build_index_limit: 10_000_000,
            query_cache_capacity: 1024,
            scan_threads: num_cpus::get(),
            scan_buffer_chars: 64_000,
        }
    }
}

impl EngineConfig {
    /// Set the in-memory content threshold in bytes
    pub fn with_load_to_memory_limit(mut self, bytes: u64) -> Self {
        self.load_to_memory_limit = bytes;
        self
    }

    /// Set the word-index threshold in bytes
    pub fn with_build_index_limit(mut self, bytes: u64) -> Self {
        self.build_index_limit = bytes;
        self
    }

    /// Set the query cache capacity in entries (0 disables caching)
    pub fn with_query_cache_capacity(mut self, entries: usize) -> Self {
        self.query_cache_capacity = entries;
        self
    }

    /// Set the number of scan worker threads
    pub fn with_scan_threads(mut self, threads: usize) -> Self {
        self.scan_threads = threads;
        self
    }

    /// Set the streamed-scan buffer length in characters
    pub fn with_scan_buffer_chars(mut self, chars: usize) -> Self {
        self.scan_buffer_chars = chars;
        self
    }
}
