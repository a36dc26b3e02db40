use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::debug;

use crate::{CandidateId, CandidateRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SwipeDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub candidate_id: CandidateId,
    pub decision: SwipeDecision,
    pub decided_at: DateTime<Utc>,
}

/// What `record_swipe` did with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Recorded,
    /// The id was already in the decided log; the call was an idempotent
    /// no-op. Rapid double input is expected from the UI, so this is never
    /// surfaced as an error.
    AlreadyDecided,
}

/// Selected set plus swipe log, fused behind one type so both interaction
/// modes (sequential swipe and list multi-select) mutate the same set.
///
/// The undecided list is always recomputed as pool minus decided log; it is
/// never maintained as a separate structure that could diverge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: Vec<CandidateId>,
    decided: Vec<SwipeRecord>,
}

impl SelectionState {
    /// Record one swipe decision. Repeats are idempotent no-ops. Accept
    /// inserts into the selected set; reject leaves any list-toggled
    /// selection untouched (the two mechanisms are additive).
    pub fn record_swipe(&mut self, candidate_id: &str, decision: SwipeDecision) -> SwipeOutcome {
        if self.is_decided(candidate_id) {
            debug!(
                candidate_id,
                decision = decision.as_ref(),
                "swipe repeated for an already decided candidate; ignoring"
            );
            return SwipeOutcome::AlreadyDecided;
        }

        self.decided.push(SwipeRecord {
            candidate_id: candidate_id.to_string(),
            decision,
            decided_at: Utc::now(),
        });

        if decision == SwipeDecision::Accept {
            self.insert_selected(candidate_id);
        }

        SwipeOutcome::Recorded
    }

    /// Flip membership in the selected set. Independent of swipe history:
    /// toggling on works even for a swipe-rejected candidate, and has no
    /// effect on the decided log. Returns the resulting membership.
    pub fn toggle_selection(&mut self, candidate_id: &str) -> bool {
        if let Some(position) = self.selected.iter().position(|id| id == candidate_id) {
            self.selected.remove(position);
            false
        } else {
            self.selected.push(candidate_id.to_string());
            true
        }
    }

    /// Clear the decided log and cursor so the pool can be reviewed again.
    /// Prior accepts stay selected.
    pub fn reset_swipe(&mut self) {
        self.decided.clear();
    }

    /// Empty the selected set. The decided log is untouched.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Add to the selected set, idempotently. Preserves insertion order and
    /// never stores a duplicate id.
    fn insert_selected(&mut self, candidate_id: &str) {
        if !self.is_selected(candidate_id) {
            self.selected.push(candidate_id.to_string());
        }
    }

    pub fn is_selected(&self, candidate_id: &str) -> bool {
        self.selected.iter().any(|id| id == candidate_id)
    }

    pub fn is_decided(&self, candidate_id: &str) -> bool {
        self.decided
            .iter()
            .any(|record| record.candidate_id == candidate_id)
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[CandidateId] {
        &self.selected
    }

    pub fn decided_log(&self) -> &[SwipeRecord] {
        &self.decided
    }

    /// Pool minus decided log, in pool order.
    pub fn undecided<'a>(&self, pool: &'a [CandidateRecord]) -> Vec<&'a CandidateRecord> {
        pool.iter()
            .filter(|candidate| !self.is_decided(&candidate.id))
            .collect()
    }

    /// Swipe cursor: the first candidate in pool order without a decision.
    pub fn next_undecided<'a>(&self, pool: &'a [CandidateRecord]) -> Option<&'a CandidateRecord> {
        pool.iter().find(|candidate| !self.is_decided(&candidate.id))
    }

    /// Drop selections and decisions for ids that are no longer in the pool.
    /// Called when a new search supersedes the previous candidate set.
    pub fn prune_to_pool(&mut self, pool: &[CandidateRecord]) {
        self.selected
            .retain(|id| pool.iter().any(|candidate| candidate.id == *id));
        self.decided
            .retain(|record| pool.iter().any(|candidate| candidate.id == record.candidate_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoreBreakdown;

    fn pool(ids: &[&str]) -> Vec<CandidateRecord> {
        ids.iter()
            .map(|id| CandidateRecord {
                id: id.to_string(),
                name: format!("Candidate {id}"),
                breakdown: ScoreBreakdown::default(),
                ..CandidateRecord::default()
            })
            .collect()
    }

    #[test]
    fn accept_adds_to_the_selected_set() {
        let mut state = SelectionState::default();

        assert_eq!(state.record_swipe("a", SwipeDecision::Accept), SwipeOutcome::Recorded);
        assert!(state.is_selected("a"));
        assert_eq!(state.decided_log().len(), 1);
    }

    #[test]
    fn repeated_swipes_are_idempotent() {
        let mut state = SelectionState::default();

        state.record_swipe("a", SwipeDecision::Accept);
        let before = state.clone();

        assert_eq!(
            state.record_swipe("a", SwipeDecision::Accept),
            SwipeOutcome::AlreadyDecided
        );
        // A contradictory repeat is ignored too; the first decision stands.
        assert_eq!(
            state.record_swipe("a", SwipeDecision::Reject),
            SwipeOutcome::AlreadyDecided
        );

        assert_eq!(state.selected(), before.selected());
        assert_eq!(state.decided_log(), before.decided_log());
    }

    #[test]
    fn swipe_reject_does_not_evict_a_list_selection() {
        let mut state = SelectionState::default();

        assert!(state.toggle_selection("a"));
        state.record_swipe("a", SwipeDecision::Reject);

        assert!(state.is_selected("a"));
        assert!(state.is_decided("a"));
    }

    #[test]
    fn toggle_is_independent_of_swipe_history() {
        let mut state = SelectionState::default();

        state.record_swipe("a", SwipeDecision::Reject);
        assert!(state.toggle_selection("a"));
        assert!(state.is_selected("a"));

        assert!(!state.toggle_selection("a"));
        assert!(!state.is_selected("a"));
        // The decided log never changes through toggles.
        assert_eq!(state.decided_log().len(), 1);
    }

    #[test]
    fn undecided_is_recomputed_from_the_pool() {
        let mut state = SelectionState::default();
        let pool = pool(&["a", "b", "c"]);

        assert_eq!(state.undecided(&pool).len(), 3);
        assert_eq!(state.next_undecided(&pool).unwrap().id, "a");

        state.record_swipe("a", SwipeDecision::Accept);
        state.record_swipe("b", SwipeDecision::Reject);

        assert_eq!(state.undecided(&pool).len(), 1);
        assert_eq!(state.next_undecided(&pool).unwrap().id, "c");
    }

    #[test]
    fn reset_swipe_keeps_the_selection() {
        let mut state = SelectionState::default();
        let pool = pool(&["a", "b"]);

        state.record_swipe("a", SwipeDecision::Accept);
        state.record_swipe("b", SwipeDecision::Reject);
        state.reset_swipe();

        assert!(state.is_selected("a"));
        assert!(state.decided_log().is_empty());
        assert_eq!(state.undecided(&pool).len(), 2);
    }

    #[test]
    fn clear_selection_keeps_the_decided_log() {
        let mut state = SelectionState::default();

        state.record_swipe("a", SwipeDecision::Accept);
        state.clear_selection();

        assert!(!state.is_selected("a"));
        assert!(state.is_decided("a"));
    }

    #[test]
    fn selection_order_is_preserved_for_outreach() {
        let mut state = SelectionState::default();

        state.toggle_selection("c");
        state.record_swipe("a", SwipeDecision::Accept);
        state.toggle_selection("b");

        assert_eq!(state.selected(), ["c", "a", "b"]);
    }

    #[test]
    fn prune_drops_ids_missing_from_the_new_pool() {
        let mut state = SelectionState::default();

        state.record_swipe("a", SwipeDecision::Accept);
        state.record_swipe("stale", SwipeDecision::Accept);
        state.toggle_selection("gone");

        state.prune_to_pool(&pool(&["a", "b"]));

        assert_eq!(state.selected(), ["a"]);
        assert_eq!(state.decided_log().len(), 1);
        assert_eq!(state.decided_log()[0].candidate_id, "a");
    }
}
