use std::sync::Arc;

use crate::error::Result;
use crate::models::WordRecord;
use crate::reader::CharRead;

/// Hash of a word's code-point sequence: 31x accumulator with 32-bit
/// wraparound.
///
/// This must stay bit-identical between ingest and query time; the planner
/// relies on character verification to weed out colliding words, so the hash
/// is intentionally cheap rather than collision-resistant.
pub fn word_hash(chars: impl IntoIterator<Item = char>) -> u32 {
    chars
        .into_iter()
        .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32))
}

/// Word characters are alphanumeric code points; everything else delimits
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Stream-parse `reader`, feeding one record per word run into `sink`.
///
/// A record is emitted on each word-to-delimiter transition, plus one final
/// record when the stream ends inside a word. Positions count code points
/// from the start of the stream.
pub fn scan_words<R, F>(source: &Arc<str>, reader: &mut R, mut sink: F) -> Result<()>
where
    R: CharRead + ?Sized,
    F: FnMut(WordRecord),
{
    let mut pos: u64 = 0;
    let mut in_word = false;
    let mut word_start: u64 = 0;
    let mut word_len: u32 = 0;
    let mut hash: u32 = 0;
    let mut words_parsed: u64 = 0;

    while let Some(c) = reader.next_char()? {
        if is_word_char(c) {
            if !in_word {
                in_word = true;
                word_start = pos;
                word_len = 0;
                hash = 0;
            }
            hash = hash.wrapping_mul(31).wrapping_add(c as u32);
            word_len += 1;
        } else if in_word {
            in_word = false;
            words_parsed += 1;
            sink(WordRecord {
                source: source.clone(),
                word_hash: hash,
                word_pos: word_start as u32,
                word_len,
            });
        }
        pos += 1;
        if pos % 1_000_000 == 0 {
            tracing::trace!(source = %source, chars = pos, words = words_parsed, "parse progress");
        }
    }
    if in_word {
        words_parsed += 1;
        sink(WordRecord {
            source: source.clone(),
            word_hash: hash,
            word_pos: word_start as u32,
            word_len,
        });
    }
    tracing::trace!(source = %source, chars = pos, words = words_parsed, "parse completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StringCharReader;

    fn scan(text: &str) -> Vec<WordRecord> {
        let source: Arc<str> = Arc::from("test");
        let mut reader = StringCharReader::new(Arc::from(text));
        let mut records = Vec::new();
        scan_words(&source, &mut reader, |r| records.push(r)).unwrap();
        records
    }

    fn positions(records: &[WordRecord]) -> Vec<(u32, u32)> {
        records.iter().map(|r| (r.word_pos, r.word_len)).collect()
    }

    #[test]
    fn test_word_positions() {
        let records = scan("test1, more2 testing3, test1-again5;end6");
        assert_eq!(
            positions(&records),
            vec![(0, 5), (7, 5), (13, 8), (23, 5), (29, 6), (36, 4)]
        );
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_leading_delimiters_emit_no_empty_word() {
        let records = scan(",; ab");
        assert_eq!(positions(&records), vec![(3, 2)]);
    }

    #[test]
    fn test_trailing_word_is_emitted() {
        let records = scan("ab, cd");
        assert_eq!(positions(&records), vec![(0, 2), (4, 2)]);
    }

    #[test]
    fn test_trailing_delimiters() {
        let records = scan("ab,  ");
        assert_eq!(positions(&records), vec![(0, 2)]);
    }

    #[test]
    fn test_only_delimiters() {
        assert!(scan(" ,;-\n\t").is_empty());
    }

    #[test]
    fn test_unicode_positions_count_chars() {
        // 'héllo' is five characters; the delimiter after it sits at 5
        let records = scan("héllo wörld");
        assert_eq!(positions(&records), vec![(0, 5), (6, 5)]);
    }

    #[test]
    fn test_hash_matches_rehash_of_substring() {
        let text = "test1, more2 testing3, test1-again5;end6";
        let chars: Vec<char> = text.chars().collect();
        for record in scan(text) {
            let start = record.word_pos as usize;
            let end = start + record.word_len as usize;
            let rehashed = word_hash(chars[start..end].iter().copied());
            assert_eq!(rehashed, record.word_hash);
        }
    }

    #[test]
    fn test_known_hash_collision() {
        // "Ea" and "FB" collide under the 31x hash; verification downstream
        // depends on this staying true
        assert_eq!(word_hash("Ea".chars()), word_hash("FB".chars()));
        assert_ne!(word_hash("Ea".chars()), word_hash("Eb".chars()));
    }

    #[test]
    fn test_same_word_same_hash_across_sources() {
        let a = scan("needle");
        let b = scan("xx needle yy");
        assert_eq!(a[0].word_hash, b[1].word_hash);
    }
}
