pub mod word_index;

pub use word_index::WordIndex;
