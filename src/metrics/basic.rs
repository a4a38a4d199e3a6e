//! Intrinsic sequence metrics, computed from the contig bases alone.

use bio::alphabets::dna;
use bio::seq_analysis::orf;
use serde::Serialize;

/// Shortest open reading frame worth reporting, in bases.
const MIN_ORF_LEN: usize = 30;

/// Word size for the linguistic complexity ratio.
const COMPLEXITY_K: usize = 4;

/// An open reading frame at least this long marks a contig as protein coding
/// for the `p_with_orf` aggregate.
const CODING_ORF_LEN: usize = 150;

/// Intrinsic metrics for one contig.
#[derive(Debug, Clone, Serialize)]
pub struct BasicMetrics {
    /// Contig length in bases
    pub length: usize,
    /// G+C fraction of the sequence
    pub gc: f64,
    /// Number of bases that are not A, C, G or T
    pub ambiguous_bases: usize,
    /// Length in bases of the longest open reading frame on either strand
    pub orf_length: usize,
    /// Distinct 4-mers observed over the 4-mers attainable, in [0, 1]
    pub linguistic_complexity: f64,
}

impl BasicMetrics {
    /// Compute all intrinsic metrics for an uppercase sequence.
    pub fn from_sequence(sequence: &str) -> BasicMetrics {
        let bytes = sequence.as_bytes();
        let length = bytes.len();

        let gc_count = bytes.iter().filter(|&&b| b == b'G' || b == b'C').count();
        let ambiguous_bases = bytes
            .iter()
            .filter(|&&b| !matches!(b, b'A' | b'C' | b'G' | b'T'))
            .count();

        BasicMetrics {
            length,
            gc: if length > 0 {
                gc_count as f64 / length as f64
            } else {
                0.0
            },
            ambiguous_bases,
            orf_length: longest_orf(bytes),
            linguistic_complexity: linguistic_complexity(bytes, COMPLEXITY_K),
        }
    }

    /// Fraction of unambiguous bases, in [0, 1].
    pub fn p_unambiguous(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        1.0 - self.ambiguous_bases as f64 / self.length as f64
    }

    /// Whether the contig carries an ORF long enough to look protein coding.
    pub fn has_coding_orf(&self) -> bool {
        self.orf_length >= CODING_ORF_LEN
    }
}

/// Length in bases of the longest ORF across all six reading frames.
fn longest_orf(sequence: &[u8]) -> usize {
    if sequence.len() < MIN_ORF_LEN {
        return 0;
    }
    let finder = orf::Finder::new(vec![b"ATG"], vec![b"TGA", b"TAG", b"TAA"], MIN_ORF_LEN);
    let forward = finder
        .find_all(sequence)
        .map(|o| o.end - o.start)
        .max()
        .unwrap_or(0);
    let revcomp = dna::revcomp(sequence);
    let reverse = finder
        .find_all(&revcomp)
        .map(|o| o.end - o.start)
        .max()
        .unwrap_or(0);
    forward.max(reverse)
}

/// Linguistic complexity: distinct k-mers observed over the number of k-mer
/// slots attainable for the sequence. Windows containing ambiguous bases are
/// skipped. 0.0 for sequences shorter than k.
fn linguistic_complexity(sequence: &[u8], k: usize) -> f64 {
    if sequence.len() < k {
        return 0.0;
    }
    let windows = sequence.len() - k + 1;
    let attainable = windows.min(4usize.pow(k as u32));
    let mut seen = ahash::AHashSet::with_capacity(attainable.min(1024));
    for window in sequence.windows(k) {
        if window
            .iter()
            .all(|&b| matches!(b, b'A' | b'C' | b'G' | b'T'))
        {
            seen.insert(window);
        }
    }
    seen.len() as f64 / attainable as f64
}

/// Whole-assembly aggregates over the intrinsic metrics.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyStats {
    pub n_seqs: usize,
    pub smallest: usize,
    pub largest: usize,
    pub n_bases: usize,
    pub mean_len: f64,
    pub n50: usize,
    pub gc: f64,
    pub p_with_orf: f64,
}

impl AssemblyStats {
    pub fn from_metrics(metrics: &[BasicMetrics]) -> AssemblyStats {
        let mut lengths: Vec<usize> = metrics.iter().map(|m| m.length).collect();
        lengths.sort_unstable();
        let n_seqs = lengths.len();
        let n_bases: usize = lengths.iter().sum();
        let mean_len = if n_seqs > 0 {
            n_bases as f64 / n_seqs as f64
        } else {
            0.0
        };

        // Shortest length such that contigs at least that long cover half
        // the assembled bases.
        let mut acc = 0usize;
        let mut n50 = 0usize;
        for &len in lengths.iter().rev() {
            acc += len;
            if acc * 2 >= n_bases {
                n50 = len;
                break;
            }
        }

        let gc_bases: f64 = metrics.iter().map(|m| m.gc * m.length as f64).sum();
        let with_orf = metrics.iter().filter(|m| m.has_coding_orf()).count();

        AssemblyStats {
            n_seqs,
            smallest: lengths.first().copied().unwrap_or(0),
            largest: lengths.last().copied().unwrap_or(0),
            n_bases,
            mean_len,
            n50,
            gc: if n_bases > 0 {
                gc_bases / n_bases as f64
            } else {
                0.0
            },
            p_with_orf: if n_seqs > 0 {
                with_orf as f64 / n_seqs as f64
            } else {
                0.0
            },
        }
    }
}
