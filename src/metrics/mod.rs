//! Per-contig metric categories.
//!
//! Each category has a fixed schema and is attached to a contig whole or not
//! at all, so downstream code matches on category presence instead of
//! probing string keys.

pub mod basic;
pub mod comparative;
pub mod read;

pub use basic::{AssemblyStats, BasicMetrics};
pub use comparative::{ComparativeAggregates, ComparativeMetrics};
pub use read::{AlignmentSummary, ReadAggregates, ReadMetrics};

/// All metric evidence gathered for one contig.
///
/// `basic` is computed from the sequence itself and is present for every
/// contig of a loaded assembly. The other categories depend on which evidence
/// sources the caller supplied.
#[derive(Debug, Clone, Default)]
pub struct ContigMetrics {
    pub basic: Option<BasicMetrics>,
    pub read: Option<ReadMetrics>,
    pub comparative: Option<ComparativeMetrics>,
}

impl ContigMetrics {
    pub fn from_basic(basic: BasicMetrics) -> Self {
        ContigMetrics {
            basic: Some(basic),
            read: None,
            comparative: None,
        }
    }
}
