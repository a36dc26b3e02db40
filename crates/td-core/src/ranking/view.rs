use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::CandidateRecord;

/// Key the candidate list can be ordered by. Anything outside the fixed
/// keys is treated as a single criterion key from the active weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    OverallScore,
    ExperienceYears,
    Name,
    Criterion(String),
}

impl SortKey {
    pub fn parse(raw: &str) -> SortKey {
        match raw.trim().to_lowercase().as_str() {
            "overall_score" | "score" => SortKey::OverallScore,
            "experience_years" | "experience" => SortKey::ExperienceYears,
            "name" => SortKey::Name,
            other => SortKey::Criterion(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::OverallScore => "overall_score",
            SortKey::ExperienceYears => "experience_years",
            SortKey::Name => "name",
            SortKey::Criterion(key) => key,
        }
    }

    /// Direction used when a key is selected for the first time.
    fn default_dir(&self) -> SortDir {
        match self {
            SortKey::Name => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Session-local sort toggle: re-selecting the active key flips the
/// direction instead of resetting it to descending.
#[derive(Debug, Clone, PartialEq)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::OverallScore,
            dir: SortDir::Desc,
        }
    }
}

impl SortState {
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.dir = self.dir.flipped();
        } else {
            self.dir = key.default_dir();
            self.key = key;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    pub search_text: String,
    pub min_score: Option<u32>,
    pub sort: SortState,
}

/// Read-only projection of the pool: filter by search text and minimum
/// overall score, then order by the requested key. Ranks stay exactly as
/// the engine assigned them, whatever the displayed order.
pub fn apply_view(candidates: &[CandidateRecord], options: &ViewOptions) -> Vec<CandidateRecord> {
    let needle = options.search_text.trim().to_lowercase();

    let mut rows: Vec<CandidateRecord> = candidates
        .iter()
        .filter(|candidate| matches_search(candidate, &needle))
        .filter(|candidate| {
            options
                .min_score
                .map_or(true, |min| candidate.breakdown.overall_score >= min)
        })
        .cloned()
        .collect();

    rows.sort_by(|a, b| compare(a, b, &options.sort.key, options.sort.dir));
    rows
}

/// Case-insensitive substring over the name or any skill tag. Tags are
/// already lowercased at intake.
fn matches_search(candidate: &CandidateRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    candidate.name.to_lowercase().contains(needle)
        || candidate.skills.iter().any(|skill| skill.contains(needle))
}

fn compare(a: &CandidateRecord, b: &CandidateRecord, key: &SortKey, dir: SortDir) -> Ordering {
    let ordering = match key {
        SortKey::OverallScore => a
            .breakdown
            .overall_score
            .cmp(&b.breakdown.overall_score),
        SortKey::ExperienceYears => compare_numeric(a.experience_years, b.experience_years),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Criterion(criterion) => compare_numeric(
            a.breakdown.sub_scores.get(criterion).copied(),
            b.breakdown.sub_scores.get(criterion).copied(),
        ),
    };

    let ordering = match dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    };

    // Id ascending as the final tie-break keeps the projection stable
    // across repeated calls.
    ordering.then_with(|| a.id.cmp(&b.id))
}

/// Missing values compare below present ones.
fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
