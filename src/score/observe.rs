//! Observer seam for scoring progress.
//!
//! The scoring passes stay pure and report noteworthy moments through a
//! `ScoreObserver` instead of logging inline, so library callers can route
//! them anywhere and tests can run silent.

use tracing::{info, warn};

/// Noteworthy moments during scoring and cutoff search.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreEvent<'a> {
    /// A raw metric fell outside its documented domain and the affected
    /// sub-score was left out of the composite.
    MetricViolation {
        contig: &'a str,
        metric: &'static str,
        value: f64,
    },
    /// Per-contig scoring finished.
    ContigsScored { scored: usize, unscored: usize },
    /// The cutoff sweep finished.
    CutoffSearchCompleted {
        cutoff: f64,
        optimal_score: f64,
        retained: usize,
        total: usize,
    },
}

pub trait ScoreObserver {
    fn notify(&self, event: ScoreEvent<'_>);
}

/// Routes events to the tracing subscriber. The binary's default observer.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ScoreObserver for LogObserver {
    fn notify(&self, event: ScoreEvent<'_>) {
        match event {
            ScoreEvent::MetricViolation {
                contig,
                metric,
                value,
            } => {
                warn!(contig, metric, value, "metric outside its domain, sub-score dropped");
            }
            ScoreEvent::ContigsScored { scored, unscored } => {
                info!(scored, unscored, "contig scoring complete");
            }
            ScoreEvent::CutoffSearchCompleted {
                cutoff,
                optimal_score,
                retained,
                total,
            } => {
                info!(
                    cutoff,
                    optimal_score, retained, total, "cutoff search complete"
                );
            }
        }
    }
}

/// Discards every event. Useful in tests and benchmarks.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl ScoreObserver for SilentObserver {
    fn notify(&self, _event: ScoreEvent<'_>) {}
}
