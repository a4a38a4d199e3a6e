//! CSV report writing.
//!
//! Column order is an explicit schema, not an artifact of map iteration:
//! each report declares an ordered list of column definitions and rows are
//! rendered by walking that list. Metric categories whose evidence source
//! was never supplied drop out of the schema entirely; a gap for one contig
//! within a supplied category renders as an empty cell.

pub mod assemblies;
pub mod contigs;

pub use assemblies::{write_assembly_report, AssemblyReport};
pub use contigs::{write_contig_report, ContigReport};

/// Which optional evidence sources were supplied for a run. Decides which
/// column groups appear in the reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourcePresence {
    pub read: bool,
    pub comparative: bool,
}

/// Per-contig report precision.
pub(crate) fn fmt6(value: f64) -> String {
    format!("{:.6}", value)
}

/// Per-assembly report precision.
pub(crate) fn fmt5(value: f64) -> String {
    format!("{:.5}", value)
}

pub(crate) fn opt6(value: Option<f64>) -> String {
    value.map(fmt6).unwrap_or_default()
}

pub(crate) fn opt5(value: Option<f64>) -> String {
    value.map(fmt5).unwrap_or_default()
}
