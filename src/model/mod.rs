//! Data model for the acquisition pipeline.
//!
//! All records are plain owned data. They are created by the extractors,
//! owned by the orchestrator and handed to the sink; nothing mutates a
//! record after creation except [`MatchRecord::attach_details`].

pub mod match_record;
pub mod season;
pub mod stats;
pub mod task;

pub use match_record::{decide_outcome, parse_score, MatchRecord};
pub use season::Season;
pub use stats::{DetailedStats, StatPair};
pub use task::{AcquisitionTask, TaskFailure};
