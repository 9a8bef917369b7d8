use std::sync::Arc;

use crate::error::Result;
use crate::reader::CharRead;

/// Character reader over an in-memory string
pub struct StringCharReader {
    content: Arc<str>,
    byte_pos: usize,
}

impl StringCharReader {
    pub fn new(content: Arc<str>) -> Self {
        Self {
            content,
            byte_pos: 0,
        }
    }
}

impl CharRead for StringCharReader {
    fn next_char(&mut self) -> Result<Option<char>> {
        match self.content[self.byte_pos..].chars().next() {
            Some(c) => {
                self.byte_pos += c.len_utf8();
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(s: &str) -> StringCharReader {
        StringCharReader::new(Arc::from(s))
    }

    #[test]
    fn test_reads_all_chars() {
        let mut r = reader("héllo");
        let mut out = String::new();
        while let Some(c) = r.next_char().unwrap() {
            out.push(c);
        }
        assert_eq!(out, "héllo");
    }

    #[test]
    fn test_skip_counts_chars_not_bytes() {
        let mut r = reader("héllo");
        assert_eq!(r.skip_chars(2).unwrap(), 2);
        assert_eq!(r.next_char().unwrap(), Some('l'));
    }

    #[test]
    fn test_skip_past_end() {
        let mut r = reader("ab");
        assert_eq!(r.skip_chars(10).unwrap(), 2);
        assert_eq!(r.next_char().unwrap(), None);
    }

    #[test]
    fn test_empty() {
        let mut r = reader("");
        assert_eq!(r.next_char().unwrap(), None);
    }
}
