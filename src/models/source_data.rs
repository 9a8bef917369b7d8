use bytes::Bytes;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;

/// Handle to the raw bytes of a source.
///
/// The handle stays valid for the process lifetime so the engine can re-open
/// the bytes whenever a streamed read or a cache re-materialization needs
/// them.
#[derive(Clone, Debug)]
pub enum SourceData {
    /// Bytes stored in a file on disk
    Path(PathBuf),
    /// Bytes held in memory
    Bytes(Bytes),
}

impl SourceData {
    /// Byte length of the underlying data
    pub fn byte_len(&self) -> std::io::Result<u64> {
        match self {
            SourceData::Path(path) => Ok(std::fs::metadata(path)?.len()),
            SourceData::Bytes(bytes) => Ok(bytes.len() as u64),
        }
    }

    /// Open a fresh byte stream over the data
    pub fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        match self {
            SourceData::Path(path) => Ok(Box::new(File::open(path)?)),
            SourceData::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
        }
    }
}

impl From<&str> for SourceData {
    fn from(text: &str) -> Self {
        SourceData::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<PathBuf> for SourceData {
    fn from(path: PathBuf) -> Self {
        SourceData::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_len_and_open() {
        let data = SourceData::from("hello");
        assert_eq!(data.byte_len().unwrap(), 5);

        let mut buf = String::new();
        data.open().unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }

    #[test]
    fn test_reopen_is_fresh() {
        let data = SourceData::from("abc");
        let mut first = String::new();
        data.open().unwrap().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        data.open().unwrap().read_to_string(&mut second).unwrap();
        assert_eq!(first, second);
    }
}
