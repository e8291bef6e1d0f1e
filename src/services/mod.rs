//! Services for pricing and aggregating usage data

pub mod grouper;
pub mod pricer;
pub mod rate_index;
pub mod renderer;
pub mod report;
pub mod summarizer;

pub use grouper::DateGrouper;
pub use pricer::UsagePricer;
pub use rate_index::RateIndex;
pub use summarizer::RangeSummarizer;
