//! Orchestration of the evaluation run.

pub mod evaluate;

pub use evaluate::{run, BatchSummary, ScoreOptions};
