//! The per-contig CSV report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::ScoreError;
use crate::metrics::{BasicMetrics, ComparativeMetrics, ReadMetrics};
use crate::report::{fmt6, opt6, SourcePresence};

/// Everything one report row needs, assembled by the pipeline.
#[derive(Debug, Clone)]
pub struct ContigReport {
    pub name: String,
    pub basic: BasicMetrics,
    pub read: Option<ReadMetrics>,
    pub comparative: Option<ComparativeMetrics>,
    /// Composite score, absent for unscored contigs
    pub score: Option<f64>,
    /// Whether the contig passed the optimal cutoff
    pub good: bool,
}

struct Column {
    header: &'static str,
    cell: fn(&ContigReport) -> String,
}

fn alignment_cell(r: &ContigReport, f: fn(&crate::metrics::AlignmentSummary) -> String) -> String {
    r.read
        .as_ref()
        .and_then(|read| read.alignment.as_ref())
        .map(f)
        .unwrap_or_default()
}

fn expression_cell(r: &ContigReport, f: fn(&crate::quant::ExpressionRecord) -> String) -> String {
    r.read
        .as_ref()
        .and_then(|read| read.expression.as_ref())
        .map(f)
        .unwrap_or_default()
}

fn comparative_cell(r: &ContigReport, f: fn(&ComparativeMetrics) -> String) -> String {
    r.comparative.as_ref().map(f).unwrap_or_default()
}

/// The ordered column schema for a run with the given evidence sources.
fn columns(presence: SourcePresence) -> Vec<Column> {
    let mut cols = vec![
        Column {
            header: "contig_name",
            cell: |r| r.name.clone(),
        },
        Column {
            header: "length",
            cell: |r| r.basic.length.to_string(),
        },
        Column {
            header: "gc",
            cell: |r| fmt6(r.basic.gc),
        },
        Column {
            header: "ambiguous_bases",
            cell: |r| r.basic.ambiguous_bases.to_string(),
        },
        Column {
            header: "p_unambiguous",
            cell: |r| fmt6(r.basic.p_unambiguous()),
        },
        Column {
            header: "orf_length",
            cell: |r| r.basic.orf_length.to_string(),
        },
        Column {
            header: "linguistic_complexity",
            cell: |r| fmt6(r.basic.linguistic_complexity),
        },
    ];

    if presence.read {
        cols.extend([
            Column {
                header: "fragments",
                cell: |r| alignment_cell(r, |a| a.fragments.to_string()),
            },
            Column {
                header: "good_fragments",
                cell: |r| alignment_cell(r, |a| a.good_fragments.to_string()),
            },
            Column {
                header: "bases_uncovered",
                cell: |r| alignment_cell(r, |a| a.bases_uncovered.to_string()),
            },
            Column {
                header: "p_seq_true",
                cell: |r| alignment_cell(r, |a| fmt6(a.p_seq_true)),
            },
            Column {
                header: "p_not_segmented",
                cell: |r| alignment_cell(r, |a| fmt6(a.p_not_segmented)),
            },
            Column {
                header: "eff_length",
                cell: |r| expression_cell(r, |e| e.eff_length.to_string()),
            },
            Column {
                header: "eff_count",
                cell: |r| expression_cell(r, |e| e.eff_count.to_string()),
            },
            Column {
                header: "tpm",
                cell: |r| expression_cell(r, |e| fmt6(e.tpm)),
            },
        ]);
    }

    if presence.comparative {
        cols.extend([
            Column {
                header: "ref_hits",
                cell: |r| comparative_cell(r, |c| c.ref_hits.to_string()),
            },
            Column {
                header: "p_ref_covered",
                cell: |r| comparative_cell(r, |c| fmt6(c.p_ref_covered)),
            },
            Column {
                header: "identity_gap",
                cell: |r| comparative_cell(r, |c| fmt6(c.identity_gap)),
            },
        ]);
    }

    cols.extend([
        Column {
            header: "score",
            cell: |r| opt6(r.score),
        },
        Column {
            header: "good",
            cell: |r| (r.good as u8).to_string(),
        },
    ]);
    cols
}

/// Write one CSV row per contig, in the order given.
pub fn write_contig_report(
    path: &Path,
    rows: &[ContigReport],
    presence: SourcePresence,
) -> Result<(), ScoreError> {
    let schema = columns(presence);
    let mut out = BufWriter::new(File::create(path)?);

    let header: Vec<&str> = schema.iter().map(|c| c.header).collect();
    writeln!(out, "{}", header.join(","))?;
    for row in rows {
        let cells: Vec<String> = schema.iter().map(|c| (c.cell)(row)).collect();
        writeln!(out, "{}", cells.join(","))?;
    }
    out.flush()?;
    Ok(())
}
