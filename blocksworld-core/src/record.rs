//! Types and traits for recording values emitted while running episodes.
//!
//! An environment returns a [`Record`] with every step, holding values that
//! are not part of the observation, such as the reward or the number of
//! blocks in position. A [`Recorder`] collects records, e.g., to write them
//! to a CSV file after an evaluation run.
//!
//! ```rust
//! use blocksworld_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(3.0));
//! record.insert("action", RecordValue::String("pick".to_string()));
//!
//! assert_eq!(record.get_scalar("step").unwrap(), 3.0);
//! assert!(record.get_scalar("action").is_err());
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
