//! Contig-level quality scoring and optimal-cutoff search for de-novo
//! transcriptome assemblies.
//!
//! An assembly is scored from up to three evidence sources: the contig
//! sequences themselves, read mapping summaries plus quantifier expression
//! estimates, and alignments against a reference transcriptome. Raw metrics
//! are normalized onto the unit interval, folded into one composite score
//! per contig, and aggregated into an assembly score; a sweep over the
//! score distribution then finds the cutoff whose retained contig set
//! maximizes that score.

pub mod assembly;
pub mod errors;
pub mod metrics;
pub mod pipeline;
pub mod quant;
pub mod report;
pub mod score;

pub use assembly::{Assembly, Contig};
pub use errors::ScoreError;
