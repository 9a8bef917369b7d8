use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::engine::EngineState;
use crate::engine::SourceEntry;
use crate::error::Result;
use crate::models::{SearchResults, WordRecord};
use crate::reader::StringCharReader;
use crate::search::kmp;
use crate::tokenizer::scan_words;

/// Execute a query against the locked engine state.
///
/// Queries of fewer than three words run a full KMP scan over every source:
/// with at most two words, either may be a prefix or suffix of a longer
/// source word, so the index cannot rule anything in or out. With three or
/// more words the interior words must occur whole in any match, which lets
/// the index drive candidate enumeration for indexable sources while
/// non-indexable sources are still scanned in full.
pub(crate) fn execute(
    query: &str,
    state: &EngineState,
    config: &EngineConfig,
    pool: &rayon::ThreadPool,
) -> Result<SearchResults> {
    let pattern: Vec<char> = query.chars().collect();

    let query_source: Arc<str> = Arc::from("search");
    let mut words: Vec<WordRecord> = Vec::new();
    let mut query_reader = StringCharReader::new(Arc::from(query));
    scan_words(&query_source, &mut query_reader, |w| words.push(w))?;

    if words.len() < 3 {
        tracing::debug!(query, "running non-indexed search");
        return non_indexed_search(&pattern, state, config, pool, false);
    }

    tracing::debug!(query, "running hybrid search");
    let mut results = non_indexed_search(&pattern, state, config, pool, true)?;

    // interior words only: the first and last query words may match source
    // words partially, so their hashes are unreliable witnesses
    let buckets: Vec<(&WordRecord, &[WordRecord])> = words[1..words.len() - 1]
        .iter()
        .filter(|w| w.word_len > 0)
        .map(|w| (w, state.index.lookup(w.word_hash)))
        .collect();

    if buckets.iter().any(|(_, bucket)| bucket.is_empty()) {
        // an interior word occurs in no indexable source, so the query
        // cannot either
        return Ok(results);
    }
    let (pivot, bucket) = match buckets.into_iter().min_by_key(|(_, bucket)| bucket.len()) {
        Some(smallest) => smallest,
        None => return Ok(results),
    };
    tracing::trace!(
        pivot_pos = pivot.word_pos,
        candidates = bucket.len(),
        "selected pivot word"
    );

    let mut by_source: HashMap<&Arc<str>, Vec<&WordRecord>> = HashMap::new();
    for record in bucket {
        by_source.entry(&record.source).or_default().push(record);
    }

    for (source_name, records) in by_source {
        let entry = match state.sources.get(source_name.as_ref()) {
            Some(entry) => entry,
            None => continue,
        };
        let mut positions = BTreeSet::new();
        if entry.can_load_content() {
            verify_in_memory(entry, &records, pivot.word_pos, &pattern, &mut positions)?;
        } else {
            verify_streamed(entry, &records, pivot.word_pos, &pattern, &mut positions)?;
        }
        if !positions.is_empty() {
            results
                .entry(source_name.to_string())
                .or_default()
                .extend(positions);
        }
    }
    Ok(results)
}

/// Full KMP scan, one parallel task per source
fn non_indexed_search(
    pattern: &[char],
    state: &EngineState,
    config: &EngineConfig,
    pool: &rayon::ThreadPool,
    only_non_indexable: bool,
) -> Result<SearchResults> {
    let targets: Vec<Arc<SourceEntry>> = state
        .sources
        .values()
        .filter(|entry| !(only_non_indexable && entry.can_build_index()))
        .cloned()
        .collect();

    let scanned: Result<Vec<(String, Vec<u32>)>> = pool.install(|| {
        targets
            .par_iter()
            .map(|entry| {
                let positions = scan_source(pattern, entry, config)?;
                Ok((entry.name().to_string(), positions))
            })
            .collect()
    });

    let mut results = SearchResults::new();
    for (name, positions) in scanned? {
        if !positions.is_empty() {
            results.insert(name, positions.into_iter().collect());
        }
    }
    Ok(results)
}

fn scan_source(pattern: &[char], entry: &SourceEntry, config: &EngineConfig) -> Result<Vec<u32>> {
    if entry.can_load_content() {
        Ok(kmp::find_all(pattern, &entry.content()?))
    } else {
        let mut reader = entry.char_reader()?;
        kmp::find_all_in_reader(pattern, reader.as_mut(), config.scan_buffer_chars)
    }
}

/// Verify pivot-bucket candidates against an in-memory source
fn verify_in_memory(
    entry: &SourceEntry,
    records: &[&WordRecord],
    pivot_pos: u32,
    pattern: &[char],
    out: &mut BTreeSet<u32>,
) -> Result<()> {
    let content = entry.content()?;
    let chars: Vec<char> = content.chars().collect();
    for record in records {
        let start = record.word_pos as i64 - pivot_pos as i64;
        if start < 0 {
            continue;
        }
        let start = start as usize;
        let end = start + pattern.len();
        if end > chars.len() {
            continue;
        }
        if chars[start..end] == *pattern {
            out.insert(start as u32);
        }
    }
    Ok(())
}

/// Verify pivot-bucket candidates with a single forward pass over the
/// source's reader.
///
/// Candidates are visited in ascending start order while a window of the
/// last `|pattern|` characters is kept, so a candidate overlapping the
/// previous one reuses the already-read characters instead of seeking.
fn verify_streamed(
    entry: &SourceEntry,
    records: &[&WordRecord],
    pivot_pos: u32,
    pattern: &[char],
    out: &mut BTreeSet<u32>,
) -> Result<()> {
    let mut sorted: Vec<&WordRecord> = records.to_vec();
    sorted.sort_by_key(|record| record.word_pos);

    let window_len = pattern.len();
    let mut reader = entry.char_reader()?;
    let mut window: Vec<char> = Vec::with_capacity(window_len);
    let mut window_start: i64 = 0;
    let mut cursor: i64 = 0;

    for record in sorted {
        let start = record.word_pos as i64 - pivot_pos as i64;
        if start < 0 {
            continue;
        }
        if start >= cursor {
            let to_skip = (start - cursor) as u64;
            let skipped = reader.skip_chars(to_skip)?;
            cursor += skipped as i64;
            if skipped < to_skip {
                break;
            }
            window.clear();
            window_start = start;
        } else {
            // candidate starts inside the previous window
            let keep_from = (start - window_start) as usize;
            window.drain(..keep_from);
            window_start = start;
        }
        while window.len() < window_len {
            match reader.next_char()? {
                Some(c) => {
                    window.push(c);
                    cursor += 1;
                }
                None => break,
            }
        }
        if window.len() < window_len {
            // stream too short for this candidate; later ones start further
            break;
        }
        if window.as_slice() == pattern {
            out.insert(start as u32);
        }
    }
    Ok(())
}
