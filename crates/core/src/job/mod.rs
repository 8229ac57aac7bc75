//! File jobs: what a job is, how it ends, and the executor that runs it.

mod error;
mod processor;
mod types;

pub use error::JobError;
pub use processor::FileProcessor;
pub use types::{
    CoverChange, ErrorKind, FileJob, FileOperation, JobChanges, JobFailure, JobId, JobOutcome,
    JobResult, SkipReason,
};
