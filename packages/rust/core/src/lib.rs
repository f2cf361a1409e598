//! Run orchestration for Pagesmith.
//!
//! This crate ties together generation, publishing, sitemap rebuilding, and
//! notification into a single forward-only run (see [`pipeline::run`]).

pub mod context;
pub mod pipeline;

pub use context::RunContext;
pub use pipeline::{ProgressReporter, RunResult, SilentProgress, regenerate_sitemap, run};
