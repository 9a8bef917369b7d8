use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Point-in-time engine statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineStats {
    /// Registered sources
    pub source_count: usize,
    /// Sources whose words are in the index
    pub indexed_sources: usize,
    /// Sources eligible for the in-memory content cache
    pub loaded_sources: usize,
    /// Word records held by the index across all buckets
    pub record_count: usize,
    /// Query cache counters
    pub cache: CacheStats,
}
