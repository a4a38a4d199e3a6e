//! Normalization of raw contig metrics onto the unit interval.
//!
//! Every sub-score that feeds the composite is a value in [0, 1] where
//! higher is better. Proportions pass through, the expression count is
//! log-scaled against the assembly-wide maximum, and distances are
//! inverted. A raw value outside its documented domain is recorded as a
//! violation and the affected sub-score is left missing; the caller
//! decides whether violations are warnings or fatal.

use crate::errors::ScoreError;
use crate::metrics::ContigMetrics;

/// The sub-scores a contig can contribute to its composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubMetric {
    /// Fraction of unambiguous bases
    Unambiguous,
    /// Distinct k-mer vocabulary of the sequence
    Complexity,
    /// Fraction of assigned fragments mapping coherently
    FragmentsMapped,
    /// Fraction of bases with read coverage
    BasesCovered,
    /// Per-base agreement between reads and contig
    BaseAccuracy,
    /// Probability the contig is a single transcript
    NotSegmented,
    /// Log-scaled read support relative to the assembly maximum
    ReadSupport,
    /// Fraction of the best reference transcript covered
    ReferenceCoverage,
    /// Identity of the best reference alignment
    AlignmentIdentity,
}

impl SubMetric {
    pub fn name(&self) -> &'static str {
        match self {
            SubMetric::Unambiguous => "p_unambiguous",
            SubMetric::Complexity => "linguistic_complexity",
            SubMetric::FragmentsMapped => "p_good_fragments",
            SubMetric::BasesCovered => "p_bases_covered",
            SubMetric::BaseAccuracy => "p_seq_true",
            SubMetric::NotSegmented => "p_not_segmented",
            SubMetric::ReadSupport => "read_support",
            SubMetric::ReferenceCoverage => "p_ref_covered",
            SubMetric::AlignmentIdentity => "alignment_identity",
        }
    }
}

/// Sub-scores present for one contig, in a stable push order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedScores {
    entries: Vec<(SubMetric, f64)>,
}

impl NormalizedScores {
    fn push(&mut self, sub: SubMetric, value: f64) {
        self.entries.push((sub, value));
    }

    pub fn get(&self, sub: SubMetric) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == sub)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubMetric, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A raw metric that fell outside its documented domain.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricViolation {
    pub contig: String,
    pub metric: &'static str,
    pub value: f64,
}

impl MetricViolation {
    pub fn into_error(self) -> ScoreError {
        ScoreError::InvalidMetric {
            contig: self.contig,
            metric: self.metric,
            value: self.value,
        }
    }
}

/// Result of normalizing one contig.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub scores: NormalizedScores,
    pub violations: Vec<MetricViolation>,
}

/// Maps raw metrics to sub-scores. Fit once per assembly so that the
/// expression scale is shared by every contig.
#[derive(Debug, Clone, Copy)]
pub struct MetricNormalizer {
    /// Largest eff_count per base observed across the assembly
    max_support_rate: f64,
}

impl MetricNormalizer {
    /// Learn the assembly-wide scale from every contig's evidence.
    pub fn fit(all: &[ContigMetrics]) -> MetricNormalizer {
        let mut max_rate = 0.0f64;
        for m in all {
            if let Some(expr) = m.read.as_ref().and_then(|r| r.expression.as_ref()) {
                if expr.length > 0 {
                    let rate = expr.eff_count as f64 / expr.length as f64;
                    if rate > max_rate {
                        max_rate = rate;
                    }
                }
            }
        }
        MetricNormalizer {
            max_support_rate: max_rate,
        }
    }

    /// Map one contig's raw metrics to sub-scores.
    ///
    /// Undefined sub-scores (a ratio with a zero denominator, a missing
    /// evidence category) are left out rather than recorded as zero; a
    /// present zero stays a zero.
    pub fn normalize(&self, contig_id: &str, m: &ContigMetrics) -> Normalized {
        let mut out = Normalized::default();

        if let Some(basic) = &m.basic {
            out.scores.push(SubMetric::Unambiguous, basic.p_unambiguous());
            out.scores
                .push(SubMetric::Complexity, basic.linguistic_complexity);
        }

        if let Some(aln) = m.read.as_ref().and_then(|r| r.alignment.as_ref()) {
            if aln.fragments > 0 {
                let p_good = aln.good_fragments as f64 / aln.fragments as f64;
                if let Some(v) =
                    domain_checked(contig_id, "p_good_fragments", p_good, &mut out)
                {
                    out.scores.push(SubMetric::FragmentsMapped, v);
                }
            }
            if let Some(basic) = &m.basic {
                if basic.length > 0 {
                    let len = basic.length as f64;
                    let covered = (len - aln.bases_uncovered as f64) / len;
                    if let Some(v) =
                        domain_checked(contig_id, "p_bases_covered", covered, &mut out)
                    {
                        out.scores.push(SubMetric::BasesCovered, v);
                    }
                }
            }
            if let Some(v) = domain_checked(contig_id, "p_seq_true", aln.p_seq_true, &mut out) {
                out.scores.push(SubMetric::BaseAccuracy, v);
            }
            if let Some(v) =
                domain_checked(contig_id, "p_not_segmented", aln.p_not_segmented, &mut out)
            {
                out.scores.push(SubMetric::NotSegmented, v);
            }
        }

        if let Some(expr) = m.read.as_ref().and_then(|r| r.expression.as_ref()) {
            // a zero fitted scale makes the ratio undefined for every contig
            if expr.length > 0 && self.max_support_rate > 0.0 {
                let rate = expr.eff_count as f64 / expr.length as f64;
                let support = (rate.ln_1p() / self.max_support_rate.ln_1p()).min(1.0);
                out.scores.push(SubMetric::ReadSupport, support);
            }
        }

        if let Some(cmp) = &m.comparative {
            if let Some(v) =
                domain_checked(contig_id, "p_ref_covered", cmp.p_ref_covered, &mut out)
            {
                out.scores.push(SubMetric::ReferenceCoverage, v);
            }
            if let Some(gap) = domain_checked(contig_id, "identity_gap", cmp.identity_gap, &mut out)
            {
                out.scores
                    .push(SubMetric::AlignmentIdentity, (1.0 - gap).max(0.0));
            }
        }

        out
    }
}

/// Validate a proportion-shaped raw value. A value outside [0, 1] or not
/// finite is recorded as a violation and yields no sub-score.
fn domain_checked(
    contig_id: &str,
    metric: &'static str,
    value: f64,
    out: &mut Normalized,
) -> Option<f64> {
    if (0.0..=1.0).contains(&value) {
        return Some(value);
    }
    out.violations.push(MetricViolation {
        contig: contig_id.to_string(),
        metric,
        value,
    });
    None
}
