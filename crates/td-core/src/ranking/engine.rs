use std::cmp::Ordering;

use tracing::warn;

use super::weights::CriteriaWeights;
use crate::CandidateRecord;

/// Result of one full evaluation pass over a candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub candidates: Vec<CandidateRecord>,
    /// Set when the active weight sum is zero. Scores are zeroed and the
    /// order falls back to candidate id so the UI still gets a stable list.
    pub degenerate_weights: bool,
}

pub struct RankingEngine;

impl RankingEngine {
    /// Score and rank the pool under the given weights.
    ///
    /// Pure function of its inputs: candidates are cloned, scored, sorted by
    /// overall score descending with id ascending as the tie-break, and
    /// returned with 1-based ranks attached. Re-run wholesale whenever the
    /// pool or the weights change; partial updates are never patched in.
    pub fn evaluate(candidates: &[CandidateRecord], weights: &CriteriaWeights) -> RankingOutcome {
        let weight_sum = weights.sum();
        let degenerate = weight_sum <= 0.0;
        if degenerate && !candidates.is_empty() {
            warn!(
                criteria = weights.len(),
                "active weight sum is zero; all overall scores degraded to 0"
            );
        }

        let mut scored: Vec<CandidateRecord> = candidates
            .iter()
            .cloned()
            .map(|mut candidate| {
                candidate.breakdown.overall_score = if degenerate {
                    0
                } else {
                    weighted_overall(&candidate, weights, weight_sum)
                };
                candidate.breakdown.rank = None;
                candidate
            })
            .collect();

        scored.sort_by(
            |a, b| match b.breakdown.overall_score.cmp(&a.breakdown.overall_score) {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            },
        );

        for (position, candidate) in scored.iter_mut().enumerate() {
            candidate.breakdown.rank = Some(position as u32 + 1);
        }

        RankingOutcome {
            candidates: scored,
            degenerate_weights: degenerate,
        }
    }
}

/// `round(Σ weight_i * sub_i / Σ weight_i)` over the active criteria. A
/// criterion missing from the candidate contributes 0 while its weight stays
/// in the denominator, so missing data penalizes the score rather than
/// inflating it.
fn weighted_overall(
    candidate: &CandidateRecord,
    weights: &CriteriaWeights,
    weight_sum: f64,
) -> u32 {
    let weighted: f64 = weights
        .iter()
        .map(|criterion| {
            let sub = candidate
                .breakdown
                .sub_scores
                .get(&criterion.key)
                .copied()
                .unwrap_or(0.0);
            criterion.weight * sub.clamp(0.0, 100.0)
        })
        .sum();

    (weighted / weight_sum).round().clamp(0.0, 100.0) as u32
}
