use bytes::Bytes;
use parking_lot::Mutex;
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{NeedlexError, Result};
use crate::models::SourceData;
use crate::reader::{CharRead, StringCharReader, Utf8CharReader};

/// A registered source: its byte handle, access policies, and the soft
/// content cache.
///
/// Policies are computed once at registration and never change. The content
/// cache is only a performance artifact: dropping it (see
/// [`SourceEntry::release_content`]) is always safe because the next access
/// re-decodes from the byte handle.
pub struct SourceEntry {
    name: Arc<str>,
    data: SourceData,
    byte_len: u64,
    load_to_memory: bool,
    build_index: bool,
    content: Mutex<Option<Arc<str>>>,
}

impl SourceEntry {
    pub fn new(name: Arc<str>, data: SourceData, byte_len: u64, config: &EngineConfig) -> Self {
        Self {
            name,
            data,
            byte_len,
            load_to_memory: byte_len <= config.load_to_memory_limit,
            build_index: byte_len <= config.build_index_limit,
            content: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// Whether the decoded content may be cached in memory
    pub fn can_load_content(&self) -> bool {
        self.load_to_memory
    }

    /// Whether the source's words go into the word index
    pub fn can_build_index(&self) -> bool {
        self.build_index
    }

    /// Decoded content, materializing the cache on first access.
    ///
    /// The mutex is held across the decode so racing readers perform at most
    /// one decode between them.
    pub fn content(&self) -> Result<Arc<str>> {
        if !self.load_to_memory {
            return Err(NeedlexError::NotLoadable(self.name.to_string()));
        }
        let mut cached = self.content.lock();
        if let Some(content) = cached.as_ref() {
            return Ok(content.clone());
        }
        let mut bytes = Vec::with_capacity(self.byte_len as usize);
        self.data.open()?.read_to_end(&mut bytes)?;
        let decoded = String::from_utf8(bytes).map_err(|err| NeedlexError::InvalidUtf8 {
            offset: err.utf8_error().valid_up_to() as u64,
        })?;
        let content: Arc<str> = Arc::from(decoded);
        *cached = Some(content.clone());
        Ok(content)
    }

    /// Drop the cached content; re-materialized on next access
    pub fn release_content(&self) {
        *self.content.lock() = None;
    }

    /// Fresh character reader over the full content
    pub fn char_reader(&self) -> Result<Box<dyn CharRead>> {
        if self.load_to_memory {
            Ok(Box::new(StringCharReader::new(self.content()?)))
        } else {
            Ok(Box::new(Utf8CharReader::new(self.data.open()?)))
        }
    }

    /// Character range `[from, from + len)`, clamped to the content.
    ///
    /// A negative `from` is clamped to zero without shifting the end, so the
    /// returned fragment is correspondingly shorter.
    pub fn slice(&self, from: i64, len: u64) -> Result<String> {
        let end = from.saturating_add(len.min(i64::MAX as u64) as i64);
        let begin = from.max(0);
        if end <= begin {
            return Ok(String::new());
        }
        let count = (end - begin) as usize;
        if self.load_to_memory {
            let content = self.content()?;
            Ok(content.chars().skip(begin as usize).take(count).collect())
        } else {
            let mut reader = Utf8CharReader::new(self.data.open()?);
            reader.skip_chars(begin as u64)?;
            let mut out = String::with_capacity(count.min(64 * 1024));
            for _ in 0..count {
                match reader.next_char()? {
                    Some(c) => out.push(c),
                    None => break,
                }
            }
            Ok(out)
        }
    }

    /// Raw byte stream over the source.
    ///
    /// For loadable sources this streams the bytes of the decoded content;
    /// otherwise the byte handle is re-opened. Offsets returned by search are
    /// character offsets, not offsets into this stream.
    pub fn byte_stream(&self) -> Result<Box<dyn Read + Send>> {
        if self.load_to_memory {
            let content = self.content()?;
            Ok(Box::new(Cursor::new(Bytes::copy_from_slice(
                content.as_bytes(),
            ))))
        } else {
            Ok(self.data.open()?)
        }
    }
}
