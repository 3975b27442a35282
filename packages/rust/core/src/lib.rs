//! Batch orchestration for answerfill.
//!
//! Ties extraction, answer parsing, and template filling into the end-to-end
//! `fill` workflow: many sources in, one filled document out.

pub mod batch;

pub use batch::{
    BatchOrchestrator, BatchReport, ProgressReporter, SilentProgress, SourceOutcome, SourceReport,
};
