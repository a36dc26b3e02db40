use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::intake::{normalize_candidate, RawCandidate};
use crate::outreach::{OutreachError, OutreachGenerator, OutreachMessage, OutreachRequestConfig};
use crate::ranking::{apply_view, CriteriaWeights, RankingEngine, SortKey, SortState, ViewOptions};
use crate::selection::{SelectionState, SwipeDecision, SwipeOutcome};
use crate::{CandidateId, CandidateRecord, SenderProfile};

/// Monotonically increasing per-session token. A response is applied only if
/// it carries the latest token, so a newer search supersedes rather than
/// queues behind an older in-flight one.
pub type RequestToken = u64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown candidate id: {0}")]
    UnknownCandidate(String),
}

/// Result of folding one search response into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIngest {
    /// False when the response carried a stale token and was discarded.
    pub accepted: bool,
    pub loaded: usize,
    pub skipped_malformed: usize,
    pub skipped_duplicates: usize,
}

impl SearchIngest {
    fn discarded() -> Self {
        Self {
            accepted: false,
            loaded: 0,
            skipped_malformed: 0,
            skipped_duplicates: 0,
        }
    }
}

/// All mutable state for one user session: candidate pool, criteria weights,
/// selection state, sort toggle and outreach results. Every mutation funnels
/// through here so the selection invariants are enforced in one place.
///
/// Created at session start, discarded at session end; nothing persists.
pub struct SearchSession {
    pool: Vec<CandidateRecord>,
    weights: CriteriaWeights,
    selection: SelectionState,
    sort: SortState,
    outreach: HashMap<CandidateId, OutreachMessage>,
    latest_token: RequestToken,
    degenerate_weights: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            pool: Vec::new(),
            weights: CriteriaWeights::default(),
            selection: SelectionState::default(),
            sort: SortState::default(),
            outreach: HashMap::new(),
            latest_token: 0,
            degenerate_weights: false,
        }
    }

    /// Issue the token for a new search. Any response still in flight for a
    /// previous token becomes stale the moment this is called.
    pub fn begin_search(&mut self) -> RequestToken {
        self.latest_token += 1;
        self.latest_token
    }

    /// Fold a search response into the session: normalize payloads (skipping
    /// malformed records and duplicate ids), replace the pool, re-evaluate,
    /// and prune selection state and outreach results down to the new pool.
    #[instrument(skip(self, payloads), fields(payload_count = payloads.len()))]
    pub fn apply_search_results(
        &mut self,
        token: RequestToken,
        payloads: Vec<RawCandidate>,
    ) -> SearchIngest {
        if token != self.latest_token {
            info!(
                token,
                latest = self.latest_token,
                "stale search response discarded"
            );
            return SearchIngest::discarded();
        }

        let mut seen: HashSet<CandidateId> = HashSet::new();
        let mut pool = Vec::new();
        let mut skipped_malformed = 0;
        let mut skipped_duplicates = 0;

        for payload in payloads {
            match normalize_candidate(payload) {
                Ok(candidate) => {
                    if seen.insert(candidate.id.clone()) {
                        pool.push(candidate);
                    } else {
                        skipped_duplicates += 1;
                        warn!(candidate_id = %candidate.id, "duplicate candidate id in search response; skipping");
                    }
                }
                Err(err) => {
                    skipped_malformed += 1;
                    warn!(error = %err, "skipping malformed candidate payload");
                }
            }
        }

        self.pool = pool;
        self.reevaluate();
        self.selection.prune_to_pool(&self.pool);

        let pool_ids: HashSet<CandidateId> =
            self.pool.iter().map(|candidate| candidate.id.clone()).collect();
        self.outreach.retain(|id, _| pool_ids.contains(id));

        SearchIngest {
            accepted: true,
            loaded: self.pool.len(),
            skipped_malformed,
            skipped_duplicates,
        }
    }

    fn reevaluate(&mut self) {
        let outcome = RankingEngine::evaluate(&self.pool, &self.weights);
        self.pool = outcome.candidates;
        self.degenerate_weights = outcome.degenerate_weights;
    }

    // --- weights -----------------------------------------------------------

    pub fn weights(&self) -> &CriteriaWeights {
        &self.weights
    }

    pub fn degenerate_weights(&self) -> bool {
        self.degenerate_weights
    }

    pub fn replace_weights(&mut self, weights: CriteriaWeights) {
        self.weights = weights;
        self.reevaluate();
    }

    pub fn upsert_criterion(&mut self, key: &str, weight: f64, label: &str) {
        self.weights.upsert(key, weight, label);
        self.reevaluate();
    }

    pub fn remove_criterion(&mut self, key: &str) -> bool {
        let removed = self.weights.remove(key);
        if removed {
            self.reevaluate();
        }
        removed
    }

    // --- pool & views ------------------------------------------------------

    /// Ranked pool in engine order.
    pub fn pool(&self) -> &[CandidateRecord] {
        &self.pool
    }

    /// Filtered and sorted projection under the session's sort state.
    pub fn view(&self, search_text: &str, min_score: Option<u32>) -> Vec<CandidateRecord> {
        apply_view(
            &self.pool,
            &ViewOptions {
                search_text: search_text.to_string(),
                min_score,
                sort: self.sort.clone(),
            },
        )
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    // --- selection ---------------------------------------------------------

    pub fn record_swipe(
        &mut self,
        candidate_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeOutcome, SessionError> {
        self.ensure_known(candidate_id)?;
        Ok(self.selection.record_swipe(candidate_id, decision))
    }

    pub fn toggle_selection(&mut self, candidate_id: &str) -> Result<bool, SessionError> {
        self.ensure_known(candidate_id)?;
        Ok(self.selection.toggle_selection(candidate_id))
    }

    pub fn reset_swipe(&mut self) {
        self.selection.reset_swipe();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Swipe cursor over the ranked pool.
    pub fn next_swipe_candidate(&self) -> Option<&CandidateRecord> {
        self.selection.next_undecided(&self.pool)
    }

    pub fn undecided_count(&self) -> usize {
        self.selection.undecided(&self.pool).len()
    }

    /// Selected candidates in selection order, for the outreach listing.
    pub fn selected_candidates(&self) -> Vec<CandidateRecord> {
        self.selection
            .selected()
            .iter()
            .filter_map(|id| {
                self.pool
                    .iter()
                    .find(|candidate| candidate.id == *id)
                    .cloned()
            })
            .collect()
    }

    // --- outreach ----------------------------------------------------------

    /// Generate messages for the current selection and merge them into the
    /// session map, replacing prior entries per candidate id.
    #[instrument(skip_all)]
    pub fn generate_outreach(
        &mut self,
        generator: &OutreachGenerator,
        request: &OutreachRequestConfig,
        sender: &SenderProfile,
    ) -> Result<Vec<OutreachMessage>, OutreachError> {
        let selected = self.selected_candidates();
        let generated = generator.generate(&selected, request, sender)?;
        self.outreach.extend(generated);

        // Return in selection order; the map itself is unordered.
        Ok(self
            .selection
            .selected()
            .iter()
            .filter_map(|id| self.outreach.get(id).cloned())
            .collect())
    }

    pub fn outreach_messages(&self) -> &HashMap<CandidateId, OutreachMessage> {
        &self.outreach
    }

    fn ensure_known(&self, candidate_id: &str) -> Result<(), SessionError> {
        if self.pool.iter().any(|candidate| candidate.id == candidate_id) {
            Ok(())
        } else {
            Err(SessionError::UnknownCandidate(candidate_id.to_string()))
        }
    }
}
