pub mod aggregates;
pub mod batch;
pub mod boundaries;
pub mod channels;
pub mod config;
pub mod error;
pub mod export;
pub mod header;
pub mod intervals;
pub mod kinematics;
pub mod record;
pub mod values;

pub use error::ExtractionError;
pub use record::{build_subject_record, ChannelSummary, SubjectRecord};
