pub mod engine;
pub mod source;

pub use engine::SearchEngine;
pub use source::SourceEntry;
