use crate::error::Result;

/// Streaming character access over a source's decoded UTF-8 content.
///
/// All engine components that walk a source (tokenizer, streamed KMP scan,
/// slice reads, streamed candidate verification) consume this capability, so
/// in-memory and on-disk sources go through the same code paths.
pub trait CharRead: Send {
    /// Next code point, or `None` at end of stream
    fn next_char(&mut self) -> Result<Option<char>>;

    /// Skip up to `n` characters, returning the number actually skipped.
    /// Returns less than `n` only when the stream ends early.
    fn skip_chars(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n {
            if self.next_char()?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Fill `buf` with as many characters as the stream still has,
    /// returning the count
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.next_char()? {
                Some(c) => {
                    buf[filled] = c;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }
}
