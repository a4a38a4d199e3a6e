//! Contig and assembly scoring.
//!
//! The pipeline here is fit, normalize, compose, aggregate, optimize:
//! a normalizer is fitted over the whole assembly, each contig's metrics
//! become unit-interval sub-scores, sub-scores fold into a composite per
//! contig, composites fold into an assembly score, and the cutoff search
//! finds the threshold that maximizes the retained assembly score.

pub mod assembly;
pub mod contig;
pub mod cutoff;
pub mod normalize;
pub mod observe;

pub use assembly::assembly_score;
pub use contig::{composite_score, ScoredContig};
pub use cutoff::{optimize, write_good_contigs, CutoffResult};
pub use normalize::{MetricNormalizer, MetricViolation, Normalized, NormalizedScores, SubMetric};
pub use observe::{LogObserver, ScoreEvent, ScoreObserver, SilentObserver};
