//! The per-assembly CSV report, one row per input assembly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::ScoreError;
use crate::metrics::{AssemblyStats, ComparativeAggregates, ReadAggregates};
use crate::report::{fmt5, opt5, SourcePresence};

/// Aggregate results for one assembly. Score fields stay empty for an
/// assembly whose scoring failed; its row still records the sequence stats.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub assembly: String,
    pub stats: AssemblyStats,
    pub read: Option<ReadAggregates>,
    pub comparative: Option<ComparativeAggregates>,
    pub score: Option<f64>,
    pub optimal_score: Option<f64>,
    pub cutoff: Option<f64>,
    pub n_good_contigs: Option<usize>,
    pub p_good_contigs: Option<f64>,
}

struct Column {
    header: &'static str,
    cell: fn(&AssemblyReport) -> String,
}

fn read_cell(r: &AssemblyReport, f: fn(&ReadAggregates) -> String) -> String {
    r.read.as_ref().map(f).unwrap_or_default()
}

fn comparative_cell(r: &AssemblyReport, f: fn(&ComparativeAggregates) -> String) -> String {
    r.comparative.as_ref().map(f).unwrap_or_default()
}

fn columns(presence: SourcePresence) -> Vec<Column> {
    let mut cols = vec![
        Column {
            header: "assembly",
            cell: |r| r.assembly.clone(),
        },
        Column {
            header: "n_seqs",
            cell: |r| r.stats.n_seqs.to_string(),
        },
        Column {
            header: "smallest",
            cell: |r| r.stats.smallest.to_string(),
        },
        Column {
            header: "largest",
            cell: |r| r.stats.largest.to_string(),
        },
        Column {
            header: "n_bases",
            cell: |r| r.stats.n_bases.to_string(),
        },
        Column {
            header: "mean_len",
            cell: |r| fmt5(r.stats.mean_len),
        },
        Column {
            header: "n50",
            cell: |r| r.stats.n50.to_string(),
        },
        Column {
            header: "gc",
            cell: |r| fmt5(r.stats.gc),
        },
        Column {
            header: "p_with_orf",
            cell: |r| fmt5(r.stats.p_with_orf),
        },
    ];

    if presence.read {
        cols.extend([
            Column {
                header: "total_fragments",
                cell: |r| read_cell(r, |a| a.total_fragments.to_string()),
            },
            Column {
                header: "p_fragments_good",
                cell: |r| read_cell(r, |a| opt5(a.p_fragments_good)),
            },
            Column {
                header: "p_bases_covered",
                cell: |r| read_cell(r, |a| opt5(a.p_bases_covered)),
            },
            Column {
                header: "p_expressed",
                cell: |r| read_cell(r, |a| opt5(a.p_expressed)),
            },
        ]);
    }

    if presence.comparative {
        cols.extend([
            Column {
                header: "p_contigs_with_hit",
                cell: |r| comparative_cell(r, |a| fmt5(a.p_contigs_with_hit)),
            },
            Column {
                header: "mean_ref_covered",
                cell: |r| comparative_cell(r, |a| fmt5(a.mean_ref_covered)),
            },
        ]);
    }

    cols.extend([
        Column {
            header: "score",
            cell: |r| opt5(r.score),
        },
        Column {
            header: "optimal_score",
            cell: |r| opt5(r.optimal_score),
        },
        Column {
            header: "cutoff",
            cell: |r| opt5(r.cutoff),
        },
        Column {
            header: "n_good_contigs",
            cell: |r| r.n_good_contigs.map(|n| n.to_string()).unwrap_or_default(),
        },
        Column {
            header: "p_good_contigs",
            cell: |r| opt5(r.p_good_contigs),
        },
    ]);
    cols
}

/// Write one CSV row per assembly, in the order given.
pub fn write_assembly_report(
    path: &Path,
    rows: &[AssemblyReport],
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BasicMetrics;
    use std::fs;
    use tempfile::tempdir;

    fn stats() -> AssemblyStats {
        let metrics = vec![
            BasicMetrics::from_sequence("ACGTACGTACGTACGTACGT"),
            BasicMetrics::from_sequence("ACGT"),
        ];
        AssemblyStats::from_metrics(&metrics)
    }

    #[test]
    fn rows_round_to_five_places() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assemblies.csv");
        let row = AssemblyReport {
            assembly: "asm".to_string(),
            stats: stats(),
            read: None,
            comparative: None,
            score: Some(2.0 / 3.0),
            optimal_score: Some(0.75),
            cutoff: Some(0.5),
            n_good_contigs: Some(1),
            p_good_contigs: Some(0.5),
        };
        write_assembly_report(&path, &[row], SourcePresence::default()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.lines().next().unwrap().starts_with("assembly,n_seqs"));
        assert!(text.contains("0.66667"));
        assert!(!text.contains("0.666667"));
    }

    #[test]
    fn failed_assemblies_keep_their_stats_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assemblies.csv");
        let row = AssemblyReport {
            assembly: "asm".to_string(),
            stats: stats(),
            read: None,
            comparative: None,
            score: None,
            optimal_score: None,
            cutoff: None,
            n_good_contigs: None,
            p_good_contigs: None,
        };
        write_assembly_report(&path, &[row], SourcePresence::default()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let data = text.lines().nth(1).unwrap();
        assert!(data.starts_with("asm,2,"));
        assert!(data.ends_with(",,,,"));
    }
}
