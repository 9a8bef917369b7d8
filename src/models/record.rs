use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A single word occurrence emitted by the tokenizer.
///
/// Positions and lengths are counted in characters of the decoded UTF-8
/// stream, not bytes. The hash is the 31x-accumulator hash over the word's
/// code points with 32-bit wraparound, so the ingest-time hash of a word
/// always equals the query-time hash of the same word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
    pub source: Arc<str>,
    pub word_hash: u32,
    pub word_pos: u32,
    pub word_len: u32,
}

/// Per-source match offsets, ascending and deduplicated.
///
/// Offsets are character offsets into the decoded source; sources with no
/// matches are omitted from the map.
pub type SearchResults = HashMap<String, BTreeSet<u32>>;
