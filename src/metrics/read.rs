//! Read-mapping metrics: per-contig alignment summaries produced by the
//! aligner wrapper, merged with expression records from the quantifier.

use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;

use crate::assembly::open_text;
use crate::errors::ScoreError;
use crate::metrics::ContigMetrics;
use crate::quant::ExpressionRecord;

/// Per-contig summary of how the read set maps to the contig.
///
/// Produced upstream by the alignment wrapper; consumed here as numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    /// Fragments assigned to the contig
    pub fragments: u64,
    /// Fragments mapping in the expected orientation and distance
    pub good_fragments: u64,
    /// Bases with no read coverage at all
    pub bases_uncovered: u64,
    /// Per-base agreement between reads and contig, in [0, 1]
    pub p_seq_true: f64,
    /// Probability the contig derives from a single transcript, in [0, 1]
    pub p_not_segmented: f64,
}

/// Read-derived evidence for one contig. Either part may be absent
/// independently of the other.
#[derive(Debug, Clone, Default)]
pub struct ReadMetrics {
    pub alignment: Option<AlignmentSummary>,
    pub expression: Option<ExpressionRecord>,
}

impl ReadMetrics {
    pub fn is_empty(&self) -> bool {
        self.alignment.is_none() && self.expression.is_none()
    }
}

/// Parse the alignment wrapper's per-contig table.
///
/// Tab-separated with one header line; columns: contig name, fragments,
/// good fragments, bases uncovered, p_seq_true, p_not_segmented.
pub fn read_alignment_summaries(
    path: &Path,
) -> Result<AHashMap<String, AlignmentSummary>, ScoreError> {
    let reader = open_text(path)?;
    let display = path.display().to_string();
    let mut summaries = AHashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = index as u64 + 1;
        if lineno == 1 || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 6 {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("expected 6 columns, found {}", fields.len()),
            });
        }
        let parse_count = |field: &str, what: &str| -> Result<u64, ScoreError> {
            field.parse::<u64>().map_err(|_| ScoreError::Table {
                path: display.clone(),
                line: lineno,
                msg: format!("invalid {} '{}'", what, field),
            })
        };
        let parse_prop = |field: &str, what: &str| -> Result<f64, ScoreError> {
            field.parse::<f64>().map_err(|_| ScoreError::Table {
                path: display.clone(),
                line: lineno,
                msg: format!("invalid {} '{}'", what, field),
            })
        };
        let summary = AlignmentSummary {
            fragments: parse_count(fields[1], "fragment count")?,
            good_fragments: parse_count(fields[2], "good fragment count")?,
            bases_uncovered: parse_count(fields[3], "uncovered base count")?,
            p_seq_true: parse_prop(fields[4], "p_seq_true")?,
            p_not_segmented: parse_prop(fields[5], "p_not_segmented")?,
        };
        if summaries.insert(fields[0].to_string(), summary).is_some() {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("duplicate row for contig '{}'", fields[0]),
            });
        }
    }

    Ok(summaries)
}

/// Whole-assembly aggregates over the read evidence.
#[derive(Debug, Clone)]
pub struct ReadAggregates {
    pub total_fragments: u64,
    /// Good fragments over assigned fragments, across the assembly
    pub p_fragments_good: Option<f64>,
    /// Covered bases over total bases, across contigs with alignment data
    pub p_bases_covered: Option<f64>,
    /// Fraction of contigs with a nonzero effective count
    pub p_expressed: Option<f64>,
}

/// Aggregate read evidence across an assembly. Returns `None` when no contig
/// carries any read-derived metric.
pub fn aggregate(all: &[ContigMetrics]) -> Option<ReadAggregates> {
    let mut total_fragments = 0u64;
    let mut good_fragments = 0u64;
    let mut covered_bases = 0u64;
    let mut aligned_bases = 0u64;
    let mut expressed = 0usize;
    let mut with_expression = 0usize;
    let mut any = false;

    for m in all {
        let Some(read) = &m.read else { continue };
        if read.is_empty() {
            continue;
        }
        any = true;
        if let Some(aln) = &read.alignment {
            total_fragments += aln.fragments;
            good_fragments += aln.good_fragments;
            if let Some(basic) = &m.basic {
                let len = basic.length as u64;
                aligned_bases += len;
                covered_bases += len.saturating_sub(aln.bases_uncovered);
            }
        }
        if let Some(expr) = &read.expression {
            with_expression += 1;
            if expr.eff_count > 0 {
                expressed += 1;
            }
        }
    }

    if !any {
        return None;
    }
    Some(ReadAggregates {
        total_fragments,
        p_fragments_good: (total_fragments > 0)
            .then(|| good_fragments as f64 / total_fragments as f64),
        p_bases_covered: (aligned_bases > 0)
            .then(|| covered_bases as f64 / aligned_bases as f64),
        p_expressed: (with_expression > 0).then(|| expressed as f64 / with_expression as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "contig_name\tfragments\tgood_fragments\tbases_uncovered\tp_seq_true\tp_not_segmented"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn parses_summary_rows() {
        let file = write_table(&[
            "c1\t120\t96\t10\t0.98\t1.0",
            "c2\t0\t0\t500\t0.0\t0.5",
        ]);
        let map = read_alignment_summaries(file.path()).unwrap();
        assert_eq!(map.len(), 2);
        let c1 = &map["c1"];
        assert_eq!(c1.fragments, 120);
        assert_eq!(c1.good_fragments, 96);
        assert!((c1.p_seq_true - 0.98).abs() < 1e-12);
    }

    #[test]
    fn rejects_short_rows() {
        let file = write_table(&["c1\t120\t96"]);
        let err = read_alignment_summaries(file.path()).unwrap_err();
        match err {
            ScoreError::Table { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_contigs() {
        let file = write_table(&["c1\t1\t1\t0\t1.0\t1.0", "c1\t2\t2\t0\t1.0\t1.0"]);
        assert!(matches!(
            read_alignment_summaries(file.path()),
            Err(ScoreError::Table { .. })
        ));
    }
}
