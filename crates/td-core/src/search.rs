use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::intake::RawCandidate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search backend unavailable: {0}")]
    Unavailable(String),
    #[error("search backend returned a malformed payload: {0}")]
    MalformedResponse(String),
}

/// External candidate-search collaborator: free-text query in, raw candidate
/// payloads out. Normalization of the payloads happens at intake, not here.
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError>;
}

/// Deterministic built-in pool so the service works without the external
/// collaborator. Query tokens are matched against name, title and skills;
/// an empty query returns the full pool.
pub struct FixtureSearchBackend {
    pool: Vec<RawCandidate>,
}

impl FixtureSearchBackend {
    pub fn new() -> Self {
        Self {
            pool: fixture_pool(),
        }
    }
}

impl Default for FixtureSearchBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBackend for FixtureSearchBackend {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        let tokens: Vec<String> = query
            .split_whitespace()
            .map(|token| token.to_lowercase())
            .collect();

        if tokens.is_empty() {
            return Ok(self.pool.clone());
        }

        Ok(self
            .pool
            .iter()
            .filter(|raw| matches_tokens(raw, &tokens))
            .cloned()
            .collect())
    }
}

fn matches_tokens(raw: &RawCandidate, tokens: &[String]) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        raw.name.as_deref().unwrap_or(""),
        raw.title.as_deref().unwrap_or(""),
        raw.summary.as_deref().unwrap_or(""),
        raw.skills.join(" ")
    )
    .to_lowercase();

    tokens.iter().any(|token| haystack.contains(token))
}

/// Backend factory. Unknown names fall back to the fixture backend so a
/// misconfigured deployment still serves a pool.
pub fn create_search_backend(name: &str) -> Box<dyn SearchBackend> {
    match name {
        "fixture" => Box::new(FixtureSearchBackend::new()),
        other => {
            warn!(backend = other, "unknown search backend; using fixture");
            Box::new(FixtureSearchBackend::new())
        }
    }
}

fn raw(
    id: &str,
    name: &str,
    title: &str,
    company: &str,
    location: &str,
    years: f64,
    skills: &[&str],
    summary: &str,
    compensation: &str,
    availability: &str,
    scores: &[(&str, f64)],
) -> RawCandidate {
    RawCandidate {
        id: Some(id.into()),
        name: Some(name.into()),
        title: Some(title.into()),
        company: Some(company.into()),
        location: Some(location.into()),
        experience_years: Some(years),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        summary: Some(summary.into()),
        compensation: Some(compensation.into()),
        availability: Some(availability.into()),
        sub_scores: scores
            .iter()
            .map(|(key, score)| (key.to_string(), *score))
            .collect::<BTreeMap<_, _>>(),
        ..RawCandidate::default()
    }
}

fn fixture_pool() -> Vec<RawCandidate> {
    vec![
        raw(
            "cand-001",
            "Avery Chen",
            "Staff Backend Engineer",
            "Vectorworks",
            "Berlin",
            9.0,
            &["Rust", "PostgreSQL", "Kubernetes", "AWS"],
            "Runs the ingestion platform for a mid-size logistics SaaS.",
            "$120k - $150k",
            "1 month notice",
            &[
                ("technical", 92.0),
                ("experience", 88.0),
                ("culture", 74.0),
                ("communication", 81.0),
            ],
        ),
        raw(
            "cand-002",
            "Bao Tran",
            "Senior Data Engineer",
            "Meridian Labs",
            "Remote (EU)",
            12.0,
            &["Python", "Spark", "Airflow", "AWS"],
            "Built the analytics warehouse twice, the second time correctly.",
            "140,000-160,000 USD",
            "Immediately available",
            &[
                ("technical", 84.0),
                ("experience", 95.0),
                ("culture", 70.0),
                ("communication", 77.0),
            ],
        ),
        raw(
            "cand-003",
            "Carmen Diaz",
            "Engineering Manager",
            "Halcyon",
            "Madrid",
            11.0,
            &["Leadership", "TypeScript", "GraphQL"],
            "Grew a platform team from four to fifteen engineers.",
            "negotiable",
            "3 months notice",
            &[
                ("experience", 90.0),
                ("culture", 88.0),
                ("communication", 93.0),
            ],
        ),
        raw(
            "cand-004",
            "Dmitri Volkov",
            "Backend Engineer",
            "Freelance",
            "Warsaw",
            5.0,
            &["Rust", "Go", "Redis"],
            "Contract work on payment rails and matching engines.",
            "$95k",
            "2 weeks notice",
            &[
                ("technical", 88.0),
                ("experience", 61.0),
                ("culture", 72.0),
                ("communication", 64.0),
            ],
        ),
        raw(
            "cand-005",
            "Emeka Obi",
            "Platform Engineer",
            "Skyfield",
            "London",
            7.5,
            &["Kubernetes", "Terraform", "Go", "Observability"],
            "Owns the deployment pipeline for forty services.",
            "£90k - £110k",
            "1 month notice",
            &[
                ("technical", 86.0),
                ("experience", 79.0),
                ("culture", 83.0),
                ("communication", 75.0),
            ],
        ),
        raw(
            "cand-006",
            "Freja Lindqvist",
            "Machine Learning Engineer",
            "Aurora Analytics",
            "Stockholm",
            6.0,
            &["Python", "PyTorch", "MLOps", "Rust"],
            "Ships ranking models end to end, including the boring parts.",
            "$130k - $145k",
            "Immediately available",
            &[
                ("technical", 90.0),
                ("experience", 72.0),
                ("culture", 80.0),
                ("communication", 83.0),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_returns_the_full_pool() {
        let backend = FixtureSearchBackend::new();
        let results = backend.search("").unwrap();
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn query_tokens_match_names_titles_and_skills() {
        let backend = FixtureSearchBackend::new();

        let results = backend.search("rust").unwrap();
        let ids: Vec<_> = results.iter().filter_map(|r| r.id.clone()).collect();
        assert!(ids.contains(&"cand-001".to_string()));
        assert!(ids.contains(&"cand-004".to_string()));
        assert!(ids.contains(&"cand-006".to_string()));

        let results = backend.search("engineering manager").unwrap();
        assert!(results
            .iter()
            .any(|r| r.id.as_deref() == Some("cand-003")));
    }

    #[test]
    fn fixture_results_are_deterministic() {
        let backend = FixtureSearchBackend::new();
        assert_eq!(backend.search("rust").unwrap(), backend.search("rust").unwrap());
    }

    #[test]
    fn factory_falls_back_to_fixture() {
        assert_eq!(create_search_backend("fixture").name(), "fixture");
        assert_eq!(create_search_backend("elastic").name(), "fixture");
    }
}
