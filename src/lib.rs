//! Formatting pipeline for queried keyboard lexicon data.
//!
//! Each job loads one `<kind>Queried.json`, runs the consolidation pass for its
//! word type under a language profile, and writes `<kind>.json`. Jobs for
//! different languages are independent and can run as a batch.

pub mod pipeline;

pub use pipeline::{
    BatchReport, FormatError, FormattedOutput, Job, JobFailure, JobReport, discover_jobs,
    format_records, run_batch, run_job,
};
