//! Composite scoring of one contig from its normalized sub-scores.

use crate::score::normalize::NormalizedScores;

/// A contig identifier with its composite score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredContig {
    pub id: String,
    pub score: f64,
}

/// Geometric mean of the sub-scores present for a contig.
///
/// Computed through a log sum so a long score vector cannot underflow.
/// Returns `None` when no sub-score is present at all; a zero sub-score
/// makes the composite exactly 0.0.
pub fn composite_score(scores: &NormalizedScores) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut log_sum = 0.0f64;
    let mut n = 0u32;
    for (_, value) in scores.iter() {
        if value == 0.0 {
            return Some(0.0);
        }
        log_sum += value.ln();
        n += 1;
    }
    Some((log_sum / f64::from(n)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BasicMetrics, ContigMetrics};
    use crate::score::normalize::MetricNormalizer;

    fn scores_for(seq: &str) -> NormalizedScores {
        let metrics = ContigMetrics::from_basic(BasicMetrics::from_sequence(seq));
        MetricNormalizer::fit(std::slice::from_ref(&metrics))
            .normalize("c", &metrics)
            .scores
    }

    #[test]
    fn empty_score_set_has_no_composite() {
        assert_eq!(composite_score(&NormalizedScores::default()), None);
    }

    #[test]
    fn single_sub_score_passes_through() {
        // an all-N contig scores zero on both basic sub-metrics
        let scores = scores_for("NNNNNNNN");
        assert_eq!(composite_score(&scores), Some(0.0));
    }

    #[test]
    fn composite_sits_between_extremes() {
        let scores = scores_for("ACGTACGTACGTACGTACGTACGT");
        let values: Vec<f64> = scores.iter().map(|(_, v)| v).collect();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(0.0f64, f64::max);
        let composite = composite_score(&scores).unwrap();
        assert!(composite >= min - 1e-12 && composite <= max + 1e-12);
    }

    #[test]
    fn any_zero_sub_score_zeroes_the_composite() {
        // one ambiguous base keeps p_unambiguous below one but above zero,
        // while an all-N sequence has a zero complexity vocabulary
        let scores = scores_for("ANNNNNNNNNNNNNN");
        assert_eq!(composite_score(&scores), Some(0.0));
    }
}
