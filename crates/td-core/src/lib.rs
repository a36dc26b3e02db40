pub mod intake;
pub mod logging;
pub mod outreach;
pub mod ranking;
pub mod search;
pub mod selection;
pub mod session;
pub mod skill_tags;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Candidate id as delivered by the search backend. Unique within one pool.
pub type CandidateId = String;

// Commonly used data models for the ranking and outreach pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<f64>,
    pub skills: Vec<String>,
    pub summary: Option<String>,
    pub compensation: Option<CompensationRange>,
    pub availability: Option<String>,
    pub breakdown: ScoreBreakdown,
}

/// Parsed compensation expectation. `raw` keeps the original backend text
/// for display even when the bounds could not be extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Criterion key -> sub-score in 0..=100.
    pub sub_scores: BTreeMap<String, f64>,
    /// Weight-normalized aggregate. Recomputed by the ranking engine on
    /// every evaluation; never trusted from the search backend.
    pub overall_score: u32,
    /// 1-based position within the evaluated pool. Assigned by the engine.
    pub rank: Option<u32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Who the outreach is sent on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub sender_name: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}
