//! Reference-based metrics: per-contig summaries of alignments against a
//! trusted reference transcriptome, produced by the comparison wrapper.

use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;

use crate::assembly::open_text;
use crate::errors::ScoreError;
use crate::metrics::ContigMetrics;

/// Per-contig evidence from reference comparison. Present only for contigs
/// with at least one reference hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparativeMetrics {
    /// Reference transcripts the contig hits
    pub ref_hits: u32,
    /// Fraction of the best-matching reference covered by the contig, in [0, 1]
    pub p_ref_covered: f64,
    /// One minus the alignment identity of the best hit, in [0, 1]
    pub identity_gap: f64,
}

/// Parse the comparison wrapper's per-contig table.
///
/// Tab-separated with one header line; columns: contig name, reference hits,
/// p_ref_covered, identity_gap. Contigs without hits are simply absent.
pub fn read_comparative_metrics(
    path: &Path,
) -> Result<AHashMap<String, ComparativeMetrics>, ScoreError> {
    let reader = open_text(path)?;
    let display = path.display().to_string();
    let mut metrics = AHashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = index as u64 + 1;
        if lineno == 1 || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("expected 4 columns, found {}", fields.len()),
            });
        }
        let ref_hits: u32 = fields[1].parse().map_err(|_| ScoreError::Table {
            path: display.clone(),
            line: lineno,
            msg: format!("invalid hit count '{}'", fields[1]),
        })?;
        let parse_prop = |field: &str, what: &str| -> Result<f64, ScoreError> {
            field.parse::<f64>().map_err(|_| ScoreError::Table {
                path: display.clone(),
                line: lineno,
                msg: format!("invalid {} '{}'", what, field),
            })
        };
        let record = ComparativeMetrics {
            ref_hits,
            p_ref_covered: parse_prop(fields[2], "p_ref_covered")?,
            identity_gap: parse_prop(fields[3], "identity_gap")?,
        };
        if metrics.insert(fields[0].to_string(), record).is_some() {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("duplicate row for contig '{}'", fields[0]),
            });
        }
    }

    Ok(metrics)
}

/// Whole-assembly aggregates over the reference comparison.
#[derive(Debug, Clone)]
pub struct ComparativeAggregates {
    /// Fraction of contigs with at least one reference hit
    pub p_contigs_with_hit: f64,
    /// Mean reference coverage over contigs with a hit
    pub mean_ref_covered: f64,
}

/// Aggregate reference evidence across an assembly. Returns `None` when the
/// comparison source was not supplied at all.
pub fn aggregate(all: &[ContigMetrics], source_present: bool) -> Option<ComparativeAggregates> {
    if !source_present || all.is_empty() {
        return None;
    }
    let mut with_hit = 0usize;
    let mut covered_sum = 0.0f64;
    for m in all {
        if let Some(cmp) = &m.comparative {
            with_hit += 1;
            covered_sum += cmp.p_ref_covered;
        }
    }
    Some(ComparativeAggregates {
        p_contigs_with_hit: with_hit as f64 / all.len() as f64,
        mean_ref_covered: if with_hit > 0 {
            covered_sum / with_hit as f64
        } else {
            0.0
        },
    })
}
