//! The evaluation run: load assemblies, gather evidence, score, search the
//! cutoff, and write reports.
//!
//! Per-contig work (sequence metrics, normalization) runs on the rayon
//! pool; everything that folds across contigs runs sequentially in input
//! order so a rerun over the same files is bit-identical.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::assembly::{self, Assembly};
use crate::errors::ScoreError;
use crate::metrics::{
    comparative, read, AssemblyStats, BasicMetrics, ContigMetrics, ReadMetrics,
};
use crate::quant::{self, QuantCommand};
use crate::report::{
    write_assembly_report, write_contig_report, AssemblyReport, ContigReport, SourcePresence,
};
use crate::score::{assembly_score, composite_score, cutoff, MetricNormalizer, Normalized};
use crate::score::{ScoreEvent, ScoreObserver, ScoredContig};

/// What to evaluate and which evidence sources to use.
///
/// The per-assembly lists are parallel to `assemblies`: either empty or
/// exactly one entry per assembly, in the same order.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    pub assemblies: Vec<PathBuf>,
    /// Directory for reports and sidecar artifacts
    pub output_dir: PathBuf,
    /// Read alignment summary tables
    pub read_stats: Vec<PathBuf>,
    /// Expression tables written by a previous quantifier run
    pub expression: Vec<PathBuf>,
    /// Read alignment files, quantified here when no expression table is
    /// given
    pub alignments: Vec<PathBuf>,
    /// Reference comparison tables
    pub ref_stats: Vec<PathBuf>,
    /// Quantifier executable
    pub quant_exe: PathBuf,
    pub threads: usize,
    /// Fail an assembly on the first metric domain violation
    pub strict_metrics: bool,
    /// Treat quantifier failure as fatal instead of degrading to
    /// "expression absent"
    pub require_read_metrics: bool,
    /// Also write the retained contigs as FASTA
    pub write_good_fasta: bool,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub failed: usize,
}

/// Score every assembly and write the merged report.
///
/// A failing assembly is logged and skipped; the batch continues and the
/// summary counts the failure. Only a misconfigured batch fails as a whole.
pub fn run(options: &ScoreOptions, observer: &dyn ScoreObserver) -> Result<BatchSummary, ScoreError> {
    validate(options)?;
    fs::create_dir_all(&options.output_dir)?;

    let presence = SourcePresence {
        read: !options.read_stats.is_empty()
            || !options.expression.is_empty()
            || !options.alignments.is_empty(),
        comparative: !options.ref_stats.is_empty(),
    };

    let mut rows = Vec::new();
    let mut failed = 0usize;
    for (index, path) in options.assemblies.iter().enumerate() {
        match evaluate_assembly(path, index, options, presence, observer) {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                failed += 1;
            }
        }
    }

    write_assembly_report(&options.output_dir.join("assemblies.csv"), &rows, presence)?;
    info!(
        "evaluated {} of {} assemblies",
        rows.len(),
        options.assemblies.len()
    );
    Ok(BatchSummary {
        evaluated: rows.len(),
        failed,
    })
}

fn validate(options: &ScoreOptions) -> Result<(), ScoreError> {
    if options.assemblies.is_empty() {
        return Err(ScoreError::Config("no assemblies given".to_string()));
    }
    let n = options.assemblies.len();
    for (flag, list) in [
        ("--read-stats", &options.read_stats),
        ("--expression", &options.expression),
        ("--alignments", &options.alignments),
        ("--ref-stats", &options.ref_stats),
    ] {
        if !list.is_empty() && list.len() != n {
            return Err(ScoreError::Config(format!(
                "{} names {} files for {} assemblies",
                flag,
                list.len(),
                n
            )));
        }
    }
    // output files are keyed by assembly name, so names must be unique
    let mut names = AHashSet::new();
    for path in &options.assemblies {
        let name = assembly::assembly_name(path);
        if !names.insert(name.clone()) {
            return Err(ScoreError::Config(format!(
                "two assemblies share the name '{}'",
                name
            )));
        }
    }
    Ok(())
}

fn evaluate_assembly(
    path: &Path,
    index: usize,
    options: &ScoreOptions,
    presence: SourcePresence,
    observer: &dyn ScoreObserver,
) -> Result<AssemblyReport, ScoreError> {
    let assembly = Assembly::from_fasta(path)?;
    let name = assembly.name.clone();
    info!("scoring {} ({} contigs)", name, assembly.len());

    let basics: Vec<BasicMetrics> = assembly
        .contigs()
        .par_iter()
        .map(|c| BasicMetrics::from_sequence(&c.sequence))
        .collect();

    let alignment = match options.read_stats.get(index) {
        Some(table) => Some(read::read_alignment_summaries(table)?),
        None => None,
    };
    let expression = gather_expression(path, index, &name, options)?;
    let comparative_map = match options.ref_stats.get(index) {
        Some(table) => Some(comparative::read_comparative_metrics(table)?),
        None => None,
    };

    let known: AHashSet<&str> = assembly.contigs().iter().map(|c| c.id.as_str()).collect();
    if let Some(map) = &alignment {
        warn_unknown_ids(&name, "alignment", map.keys(), &known);
    }
    if let Some(map) = &expression {
        warn_unknown_ids(&name, "expression", map.keys(), &known);
    }
    if let Some(map) = &comparative_map {
        warn_unknown_ids(&name, "reference", map.keys(), &known);
    }

    let metrics: Vec<ContigMetrics> = assembly
        .contigs()
        .iter()
        .zip(basics.iter())
        .map(|(contig, basic)| {
            let read_metrics = ReadMetrics {
                alignment: alignment.as_ref().and_then(|m| m.get(&contig.id)).cloned(),
                expression: expression.as_ref().and_then(|m| m.get(&contig.id)).cloned(),
            };
            ContigMetrics {
                basic: Some(basic.clone()),
                read: (!read_metrics.is_empty()).then_some(read_metrics),
                comparative: comparative_map
                    .as_ref()
                    .and_then(|m| m.get(&contig.id))
                    .cloned(),
            }
        })
        .collect();

    let normalizer = MetricNormalizer::fit(&metrics);
    let normalized: Vec<Normalized> = assembly
        .contigs()
        .par_iter()
        .zip(metrics.par_iter())
        .map(|(contig, m)| normalizer.normalize(&contig.id, m))
        .collect();

    let mut violations = 0usize;
    for n in &normalized {
        for v in &n.violations {
            if options.strict_metrics {
                return Err(v.clone().into_error());
            }
            observer.notify(ScoreEvent::MetricViolation {
                contig: &v.contig,
                metric: v.metric,
                value: v.value,
            });
            violations += 1;
        }
    }
    if violations > 0 {
        warn!("{}: {} metric values outside their domain", name, violations);
    }

    let mut scored = Vec::new();
    let mut composites: Vec<Option<f64>> = Vec::with_capacity(normalized.len());
    for (contig, n) in assembly.contigs().iter().zip(normalized.iter()) {
        let composite = composite_score(&n.scores);
        if let Some(score) = composite {
            scored.push(ScoredContig {
                id: contig.id.clone(),
                score,
            });
        }
        composites.push(composite);
    }
    observer.notify(ScoreEvent::ContigsScored {
        scored: scored.len(),
        unscored: composites.len() - scored.len(),
    });

    let (score, cutoff_result) = if scored.is_empty() {
        warn!("{}: no scorable contigs, skipping score and cutoff", name);
        (None, None)
    } else {
        let score = assembly_score(&scored)?;
        let result = cutoff::optimize(&scored, observer)?;
        (Some(score), Some(result))
    };

    let good_ids: AHashSet<&str> = cutoff_result
        .as_ref()
        .map(|r| r.good_contigs.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if let Some(result) = &cutoff_result {
        cutoff::write_good_contigs(
            &options.output_dir.join(format!("{}.good_contigs.txt", name)),
            &result.good_contigs,
        )?;
        if options.write_good_fasta {
            write_good_fasta(
                &options.output_dir.join(format!("{}.good.fa", name)),
                &assembly,
                &result.good_contigs,
            )?;
        }
    }

    let contig_rows: Vec<ContigReport> = assembly
        .contigs()
        .iter()
        .zip(basics.iter())
        .zip(metrics.iter())
        .zip(composites.iter())
        .map(|(((contig, basic), m), composite)| ContigReport {
            name: contig.id.clone(),
            basic: basic.clone(),
            read: m.read.clone(),
            comparative: m.comparative.clone(),
            score: *composite,
            good: good_ids.contains(contig.id.as_str()),
        })
        .collect();
    write_contig_report(
        &options.output_dir.join(format!("{}.contigs.csv", name)),
        &contig_rows,
        presence,
    )?;

    let stats = AssemblyStats::from_metrics(&basics);
    let n_good = cutoff_result.as_ref().map(|r| r.good_contigs.len());
    Ok(AssemblyReport {
        assembly: name,
        stats,
        read: read::aggregate(&metrics),
        comparative: comparative::aggregate(&metrics, presence.comparative),
        score,
        optimal_score: cutoff_result.as_ref().map(|r| r.optimal_score),
        cutoff: cutoff_result.as_ref().map(|r| r.cutoff),
        n_good_contigs: n_good,
        p_good_contigs: n_good.map(|n| n as f64 / assembly.len() as f64),
    })
}

/// Expression evidence for one assembly: a table given up front wins, an
/// alignment file is quantified here, and a quantifier failure degrades to
/// "expression absent" unless the caller required read metrics.
fn gather_expression(
    path: &Path,
    index: usize,
    name: &str,
    options: &ScoreOptions,
) -> Result<Option<AHashMap<String, quant::ExpressionRecord>>, ScoreError> {
    if let Some(table) = options.expression.get(index) {
        return Ok(Some(quant::parse_expression_table(table)?));
    }
    let Some(alignments) = options.alignments.get(index) else {
        return Ok(None);
    };
    let cmd = QuantCommand {
        alignments: alignments.clone(),
        targets: path.to_path_buf(),
        threads: options.threads,
    };
    let outdir = options.output_dir.join(format!("{}.quant", name));
    let quantified = quant::run_quantifier(&options.quant_exe, &cmd, &outdir)
        .and_then(|table| quant::parse_expression_table(&table));
    match quantified {
        Ok(records) => Ok(Some(records)),
        Err(err) if !options.require_read_metrics => {
            warn!("{}: {}, continuing without expression evidence", name, err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn warn_unknown_ids<'a>(
    name: &str,
    what: &str,
    ids: impl Iterator<Item = &'a String>,
    known: &AHashSet<&str>,
) {
    let unknown = ids.filter(|id| !known.contains(id.as_str())).count();
    if unknown > 0 {
        warn!(
            "{}: {} {} rows name contigs absent from the assembly",
            name, unknown, what
        );
    }
}

fn write_good_fasta(path: &Path, assembly: &Assembly, good: &[String]) -> Result<(), ScoreError> {
    let by_id: AHashMap<&str, &str> = assembly
        .contigs()
        .iter()
        .map(|c| (c.id.as_str(), c.sequence.as_str()))
        .collect();
    let mut out = BufWriter::new(File::create(path)?);
    for id in good {
        if let Some(sequence) = by_id.get(id.as_str()) {
            writeln!(out, ">{}", id)?;
            writeln!(out, "{}", sequence)?;
        }
    }
    out.flush()?;
    Ok(())
}
