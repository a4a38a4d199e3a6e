//! The errors the scoring and cutoff-search engine can return.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors produced by the metric, scoring and collaborator layers.
///
/// Every variant is recoverable at the per-assembly level: a batch run over
/// several assemblies reports the failure for the affected assembly and
/// continues with the rest.
#[derive(Debug)]
pub enum ScoreError {
    /// A raw metric value violated its declared domain: negative where a
    /// non-negative value is required, non-finite, or a proportion above 1.
    InvalidMetric {
        /// Contig the value belongs to
        contig: String,
        /// Name of the offending metric
        metric: &'static str,
        /// The value as read from the metric source
        value: f64,
    },
    /// The assembly aggregator was given no scored contigs.
    NoScorableContigs,
    /// The cutoff optimizer was given no scored contigs.
    OptimizationUndefined,
    /// The external quantifier could not be run or produced unusable output.
    Quantifier(String),
    /// A collaborator table contained a malformed row.
    Table {
        /// Path of the table file
        path: String,
        /// 1-based line number of the offending row
        line: u64,
        /// What was wrong with the row
        msg: String,
    },
    /// An assembly FASTA file could not be loaded.
    Fasta {
        /// Path of the FASTA file
        path: String,
        /// What was wrong with the file
        msg: String,
    },
    /// The run was configured inconsistently, e.g. a metric source list
    /// whose length does not match the assembly list.
    Config(String),
    /// An underlying I/O failure.
    Io(io::Error),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::InvalidMetric {
                contig,
                metric,
                value,
            } => write!(
                f,
                "invalid value {} for metric '{}' of contig '{}'",
                value, metric, contig
            ),
            ScoreError::NoScorableContigs => {
                write!(f, "no contig produced a score, nothing to aggregate")
            }
            ScoreError::OptimizationUndefined => {
                write!(f, "no contig produced a score, cutoff search is undefined")
            }
            ScoreError::Quantifier(msg) => write!(f, "quantifier failed: {}", msg),
            ScoreError::Table { path, line, msg } => {
                write!(f, "{}:{}: {}", path, line, msg)
            }
            ScoreError::Fasta { path, msg } => write!(f, "{}: {}", path, msg),
            ScoreError::Config(msg) => write!(f, "{}", msg),
            ScoreError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl StdError for ScoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ScoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScoreError {
    fn from(err: io::Error) -> Self {
        ScoreError::Io(err)
    }
}
