pub mod char_read;
pub mod string_reader;
pub mod utf8_reader;

pub use char_read::CharRead;
pub use string_reader::StringCharReader;
pub use utf8_reader::Utf8CharReader;
