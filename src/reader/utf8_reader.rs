use std::io::Read;

use crate::error::{NeedlexError, Result};
use crate::reader::CharRead;

const CHUNK_SIZE: usize = 8 * 1024;

/// Character reader decoding UTF-8 incrementally from any byte stream.
///
/// Code points may straddle read boundaries; up to three undecoded trailing
/// bytes are carried into the next chunk. A truncated or invalid sequence
/// surfaces as `InvalidUtf8` with the byte offset of the offending sequence.
pub struct Utf8CharReader<R: Read + Send> {
    inner: R,
    chunk: Vec<u8>,
    decoded: String,
    decoded_pos: usize,
    carry: [u8; 4],
    carry_len: usize,
    bytes_decoded: u64,
    eof: bool,
}

impl<R: Read + Send> Utf8CharReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            chunk: Vec::with_capacity(CHUNK_SIZE + 4),
            decoded: String::with_capacity(CHUNK_SIZE + 4),
            decoded_pos: 0,
            carry: [0; 4],
            carry_len: 0,
            bytes_decoded: 0,
            eof: false,
        }
    }

    /// Decode the next chunk into `self.decoded`. Returns false at end of
    /// stream.
    fn refill(&mut self) -> Result<bool> {
        self.decoded.clear();
        self.decoded_pos = 0;
        loop {
            self.chunk.clear();
            self.chunk.extend_from_slice(&self.carry[..self.carry_len]);
            let start = self.chunk.len();
            self.chunk.resize(start + CHUNK_SIZE, 0);
            let read = self.inner.read(&mut self.chunk[start..])?;
            self.chunk.truncate(start + read);
            if read == 0 {
                self.eof = true;
                if self.carry_len > 0 {
                    // stream ended in the middle of a multi-byte sequence
                    return Err(NeedlexError::InvalidUtf8 {
                        offset: self.bytes_decoded,
                    });
                }
                return Ok(false);
            }
            match std::str::from_utf8(&self.chunk) {
                Ok(valid) => {
                    self.decoded.push_str(valid);
                    self.bytes_decoded += self.chunk.len() as u64;
                    self.carry_len = 0;
                    return Ok(true);
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    if err.error_len().is_some() {
                        return Err(NeedlexError::InvalidUtf8 {
                            offset: self.bytes_decoded + valid_len as u64,
                        });
                    }
                    // incomplete trailing sequence, carry it into the next read
                    let tail = self.chunk.split_off(valid_len);
                    self.carry[..tail.len()].copy_from_slice(&tail);
                    self.carry_len = tail.len();
                    if let Ok(valid) = std::str::from_utf8(&self.chunk) {
                        self.decoded.push_str(valid);
                    }
                    self.bytes_decoded += valid_len as u64;
                    if valid_len > 0 {
                        return Ok(true);
                    }
                    // the chunk held nothing but a partial sequence
                }
            }
        }
    }
}

impl<R: Read + Send> CharRead for Utf8CharReader<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        loop {
            if let Some(c) = self.decoded[self.decoded_pos..].chars().next() {
                self.decoded_pos += c.len_utf8();
                return Ok(Some(c));
            }
            if self.eof || !self.refill()? {
                return Ok(None);
            }
        }
    }
}
