//! Assembly-level score: geometric mean over the scored contigs.

use crate::errors::ScoreError;
use crate::score::contig::ScoredContig;

/// Geometric mean of the contig composite scores.
///
/// Accumulated sequentially in input order so repeated runs over the same
/// contigs produce bit-identical results. Contigs without a composite score
/// must be filtered out by the caller; an empty slice is an error because a
/// mean over nothing is meaningless.
pub fn assembly_score(contigs: &[ScoredContig]) -> Result<f64, ScoreError> {
    if contigs.is_empty() {
        return Err(ScoreError::NoScorableContigs);
    }
    let mut log_sum = 0.0f64;
    for contig in contigs {
        if contig.score == 0.0 {
            return Ok(0.0);
        }
        log_sum += contig.score.ln();
    }
    Ok((log_sum / contigs.len() as f64).exp())
}
