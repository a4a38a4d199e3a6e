//! Score-cutoff search: find the threshold that maximizes the assembly
//! score of the retained contigs.
//!
//! Contigs are ranked by score and every distinct score is tried as a
//! cutoff. Prefix statistics are carried incrementally, so the whole sweep
//! is a single pass over the ranked contigs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::ScoreError;
use crate::score::contig::ScoredContig;
use crate::score::observe::{ScoreEvent, ScoreObserver};

/// Outcome of the cutoff search.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffResult {
    /// Assembly score of the retained contigs
    pub optimal_score: f64,
    /// Lowest composite score that is still retained
    pub cutoff: f64,
    /// Retained contig ids, best first
    pub good_contigs: Vec<String>,
}

/// Search every distinct composite score for the cutoff maximizing the
/// assembly score of the contigs at or above it.
///
/// Ranking is descending by score with ties broken by id, so equal-scored
/// contigs are always kept or dropped together. When two cutoffs tie on
/// score the one retaining more contigs wins; keeping everything is always
/// among the candidates, so the optimum never falls below the unfiltered
/// assembly score.
pub fn optimize(
    contigs: &[ScoredContig],
    observer: &dyn ScoreObserver,
) -> Result<CutoffResult, ScoreError> {
    if contigs.is_empty() {
        return Err(ScoreError::OptimizationUndefined);
    }

    let mut ranked: Vec<&ScoredContig> = contigs.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    let mut log_sum = 0.0f64;
    let mut zeros = 0usize;
    let mut best_score = f64::NEG_INFINITY;
    let mut best_len = ranked.len();

    for (i, contig) in ranked.iter().enumerate() {
        if contig.score == 0.0 {
            zeros += 1;
        } else {
            log_sum += contig.score.ln();
        }
        // a prefix is a candidate only where the score strictly drops,
        // so a tie group is never split by the cutoff
        let boundary = ranked
            .get(i + 1)
            .map_or(true, |next| next.score != contig.score);
        if !boundary {
            continue;
        }
        let retained = i + 1;
        let candidate = if zeros > 0 {
            0.0
        } else {
            (log_sum / retained as f64).exp()
        };
        if candidate >= best_score {
            best_score = candidate;
            best_len = retained;
        }
    }

    let cutoff = ranked[best_len - 1].score;
    let result = CutoffResult {
        optimal_score: best_score,
        cutoff,
        good_contigs: ranked[..best_len].iter().map(|c| c.id.clone()).collect(),
    };
    observer.notify(ScoreEvent::CutoffSearchCompleted {
        cutoff: result.cutoff,
        optimal_score: result.optimal_score,
        retained: best_len,
        total: ranked.len(),
    });
    Ok(result)
}

/// Write the retained contig ids, one per line, in rank order.
pub fn write_good_contigs(path: &Path, good: &[String]) -> Result<(), ScoreError> {
    let mut out = BufWriter::new(File::create(path)?);
    for id in good {
        writeln!(out, "{}", id)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::assembly::assembly_score;
    use crate::score::observe::SilentObserver;
    use std::cell::RefCell;

    fn scored(id: &str, score: f64) -> ScoredContig {
        ScoredContig {
            id: id.to_string(),
            score,
        }
    }

    #[test]
    fn empty_input_is_undefined() {
        assert!(matches!(
            optimize(&[], &SilentObserver),
            Err(ScoreError::OptimizationUndefined)
        ));
    }

    #[test]
    fn drops_the_tail_when_that_raises_the_score() {
        let contigs = vec![scored("a", 0.9), scored("b", 0.8), scored("c", 0.1)];
        let result = optimize(&contigs, &SilentObserver).unwrap();
        assert!((result.cutoff - 0.9).abs() < 1e-12);
        assert_eq!(result.good_contigs, vec!["a"]);
        assert!((result.optimal_score - 0.9).abs() < 1e-12);
    }

    #[test]
    fn never_beaten_by_keeping_everything() {
        let contigs: Vec<ScoredContig> = (0..40)
            .map(|i| scored(&format!("c{:02}", i), 0.02 + (i as f64 * 0.023) % 0.95))
            .collect();
        let unfiltered = assembly_score(&contigs).unwrap();
        let result = optimize(&contigs, &SilentObserver).unwrap();
        assert!(result.optimal_score >= unfiltered);
    }

    #[test]
    fn equal_scores_are_kept_or_dropped_together() {
        let contigs = vec![scored("b", 0.9), scored("a", 0.9), scored("c", 0.2)];
        let result = optimize(&contigs, &SilentObserver).unwrap();
        assert_eq!(result.good_contigs, vec!["a", "b"]);
        assert!((result.cutoff - 0.9).abs() < 1e-12);
    }

    #[test]
    fn uniform_scores_keep_the_whole_assembly() {
        let contigs = vec![scored("a", 0.5), scored("b", 0.5), scored("c", 0.5)];
        let result = optimize(&contigs, &SilentObserver).unwrap();
        assert_eq!(result.good_contigs.len(), 3);
        assert!((result.cutoff - 0.5).abs() < 1e-12);
    }

    #[test]
    fn all_zero_scores_keep_everything_at_cutoff_zero() {
        let contigs = vec![scored("a", 0.0), scored("b", 0.0)];
        let result = optimize(&contigs, &SilentObserver).unwrap();
        assert_eq!(result.optimal_score, 0.0);
        assert_eq!(result.cutoff, 0.0);
        assert_eq!(result.good_contigs.len(), 2);
    }

    #[test]
    fn reports_the_search_outcome() {
        struct Recorder(RefCell<Vec<(usize, usize)>>);
        impl ScoreObserver for Recorder {
            fn notify(&self, event: ScoreEvent<'_>) {
                if let ScoreEvent::CutoffSearchCompleted {
                    retained, total, ..
                } = event
                {
                    self.0.borrow_mut().push((retained, total));
                }
            }
        }
        let recorder = Recorder(RefCell::new(Vec::new()));
        let contigs = vec![scored("a", 0.9), scored("b", 0.1)];
        optimize(&contigs, &recorder).unwrap();
        assert_eq!(recorder.0.borrow().as_slice(), &[(1, 2)]);
    }
}
