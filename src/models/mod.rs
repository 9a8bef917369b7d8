pub mod record;
pub mod source_data;
pub mod stats;

pub use record::{SearchResults, WordRecord};
pub use source_data::SourceData;
pub use stats::EngineStats;
