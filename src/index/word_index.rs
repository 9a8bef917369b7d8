use std::collections::HashMap;

use crate::models::WordRecord;

/// Global word-hash index across all indexable sources.
///
/// Buckets are append-only for the process lifetime and are never
/// deduplicated: one bucket may hold records from several sources and, on
/// hash collision, records of distinct words. Consumers verify candidates
/// character-by-character.
#[derive(Default)]
pub struct WordIndex {
    buckets: HashMap<u32, Vec<WordRecord>>,
    record_count: usize,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate a staged per-source map into the global buckets.
    ///
    /// Ingest tokenizes into a local map first and merges only after the
    /// whole source parsed cleanly, so a failed parse leaves the index
    /// untouched.
    pub fn merge(&mut self, local: HashMap<u32, Vec<WordRecord>>) {
        for (hash, records) in local {
            self.record_count += records.len();
            self.buckets.entry(hash).or_default().extend(records);
        }
    }

    /// Full bucket for a hash; empty when the hash was never indexed
    pub fn lookup(&self, hash: u32) -> &[WordRecord] {
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total records across all buckets
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(source: &str, hash: u32, pos: u32) -> WordRecord {
        WordRecord {
            source: Arc::from(source),
            word_hash: hash,
            word_pos: pos,
            word_len: 2,
        }
    }

    fn staged(records: Vec<WordRecord>) -> HashMap<u32, Vec<WordRecord>> {
        let mut local: HashMap<u32, Vec<WordRecord>> = HashMap::new();
        for r in records {
            local.entry(r.word_hash).or_default().push(r);
        }
        local
    }

    #[test]
    fn test_lookup_missing_hash_is_empty() {
        let index = WordIndex::new();
        assert!(index.lookup(42).is_empty());
    }

    #[test]
    fn test_merge_concatenates_buckets() {
        let mut index = WordIndex::new();
        index.merge(staged(vec![record("a", 7, 0), record("a", 7, 10)]));
        index.merge(staged(vec![record("b", 7, 3)]));

        let bucket = index.lookup(7);
        assert_eq!(bucket.len(), 3);
        assert_eq!(index.record_count(), 3);
    }

    #[test]
    fn test_colliding_words_share_a_bucket() {
        let mut index = WordIndex::new();
        index.merge(staged(vec![record("a", 9, 0)]));
        index.merge(staged(vec![record("b", 9, 5)]));
        assert_eq!(index.lookup(9).len(), 2);
    }
}
