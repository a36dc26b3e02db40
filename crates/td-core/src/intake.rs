use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skill_tags::normalize_skill_tags;
use crate::{CandidateRecord, CompensationRange, ScoreBreakdown};

static RE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$?\s*(\d+(?:[.,]\d+)?)\s*(k)?").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("malformed candidate record: {0}")]
    MalformedRecord(String),
}

/// Candidate payload as the search / resume-ingestion collaborators deliver
/// it. Everything is optional here; `normalize_candidate` decides what is
/// fatal and what is merely absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub summary: Option<String>,
    pub compensation: Option<String>,
    pub availability: Option<String>,
    /// Authored aggregate, if the backend sends one. Ignored: the ranking
    /// engine always recomputes the aggregate from sub-scores and weights.
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub sub_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Validate and normalize one raw payload into a `CandidateRecord`.
///
/// Fails only when the identity fields (id, name) are absent or blank.
/// Skill tags are case-normalized and deduplicated in first-occurrence
/// order; sub-scores are clamped into 0..=100 with lowercased keys.
pub fn normalize_candidate(raw: RawCandidate) -> Result<CandidateRecord, RecordError> {
    let id = non_blank(raw.id)
        .ok_or_else(|| RecordError::MalformedRecord("missing candidate id".into()))?;
    let name = non_blank(raw.name)
        .ok_or_else(|| RecordError::MalformedRecord(format!("missing name for candidate {id}")))?;

    let sub_scores = raw
        .sub_scores
        .into_iter()
        .filter_map(|(key, score)| {
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return None;
            }
            Some((key, score.clamp(0.0, 100.0)))
        })
        .collect();

    Ok(CandidateRecord {
        id,
        name,
        title: non_blank(raw.title),
        company: non_blank(raw.company),
        location: non_blank(raw.location),
        experience_years: raw.experience_years.filter(|years| *years >= 0.0),
        skills: normalize_skill_tags(&raw.skills),
        summary: non_blank(raw.summary),
        compensation: raw.compensation.as_deref().and_then(parse_compensation),
        availability: non_blank(raw.availability),
        breakdown: ScoreBreakdown {
            sub_scores,
            overall_score: 0,
            rank: None,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            recommendations: raw.recommendations,
        },
    })
}

/// Parse a free-text compensation expectation such as "$120k - $150k" or
/// "140,000-160,000 USD". The first two amounts become the bounds; text
/// without any parseable amount keeps only the raw string.
pub fn parse_compensation(raw: &str) -> Option<CompensationRange> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut amounts = RE_AMOUNT.captures_iter(trimmed).filter_map(|captures| {
        let digits = captures.get(1)?.as_str();
        let thousands = captures.get(2).is_some();
        parse_amount(digits, thousands)
    });

    let min = amounts.next();
    let max = amounts.next();

    Some(CompensationRange {
        min,
        max,
        raw: trimmed.to_string(),
    })
}

fn parse_amount(digits: &str, thousands: bool) -> Option<u32> {
    let cleaned = digits.replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    let value = if thousands { value * 1_000.0 } else { value };
    if !(0.0..=u32::MAX as f64).contains(&value) {
        return None;
    }
    Some(value.round() as u32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_raw() -> RawCandidate {
        RawCandidate {
            id: Some("cand-1".into()),
            name: Some("Avery Chen".into()),
            title: Some("Staff Engineer".into()),
            company: Some("Vectorworks".into()),
            experience_years: Some(9.0),
            skills: vec!["Rust".into(), "rust".into(), "  GraphQL ".into()],
            compensation: Some("$120k - $150k".into()),
            sub_scores: BTreeMap::from([
                ("Technical".to_string(), 92.0),
                ("experience".to_string(), 140.0),
            ]),
            ..RawCandidate::default()
        }
    }

    #[test]
    fn normalizes_a_complete_payload() {
        let candidate = normalize_candidate(base_raw()).unwrap();

        assert_eq!(candidate.id, "cand-1");
        assert_eq!(candidate.skills, vec!["rust", "graphql"]);
        assert_eq!(candidate.breakdown.sub_scores["technical"], 92.0);
        // Out-of-range sub-scores are clamped, not rejected.
        assert_eq!(candidate.breakdown.sub_scores["experience"], 100.0);
        assert_eq!(candidate.breakdown.overall_score, 0);
        assert_eq!(candidate.breakdown.rank, None);
    }

    #[test]
    fn rejects_missing_or_blank_identity_fields() {
        let mut raw = base_raw();
        raw.id = None;
        assert!(matches!(
            normalize_candidate(raw),
            Err(RecordError::MalformedRecord(_))
        ));

        let mut raw = base_raw();
        raw.name = Some("   ".into());
        assert!(matches!(
            normalize_candidate(raw),
            Err(RecordError::MalformedRecord(_))
        ));
    }

    #[test]
    fn ignores_authored_overall_score() {
        let mut raw = base_raw();
        raw.overall_score = Some(99.0);

        let candidate = normalize_candidate(raw).unwrap();
        assert_eq!(candidate.breakdown.overall_score, 0);
    }

    #[test]
    fn parses_compensation_ranges() {
        let range = parse_compensation("$120k - $150k").unwrap();
        assert_eq!(range.min, Some(120_000));
        assert_eq!(range.max, Some(150_000));

        let range = parse_compensation("140,000-160,000 USD").unwrap();
        assert_eq!(range.min, Some(140_000));
        assert_eq!(range.max, Some(160_000));

        let range = parse_compensation("up to $95k").unwrap();
        assert_eq!(range.min, Some(95_000));
        assert_eq!(range.max, None);
    }

    #[test]
    fn unparseable_compensation_keeps_raw_text() {
        let range = parse_compensation("negotiable").unwrap();
        assert_eq!(range.min, None);
        assert_eq!(range.max, None);
        assert_eq!(range.raw, "negotiable");

        assert_eq!(parse_compensation("   "), None);
    }

    #[test]
    fn negative_experience_is_dropped() {
        let mut raw = base_raw();
        raw.experience_years = Some(-2.0);

        let candidate = normalize_candidate(raw).unwrap();
        assert_eq!(candidate.experience_years, None);
    }
}
