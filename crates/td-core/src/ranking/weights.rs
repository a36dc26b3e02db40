use serde::{Deserialize, Serialize};

/// One evaluation axis with its weight and display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub key: String,
    pub weight: f64,
    pub label: String,
}

/// Ordered, session-scoped criterion weights. Weights are non-negative and
/// need not sum to anything in particular; the engine normalizes by the
/// active sum at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaWeights {
    criteria: Vec<CriterionWeight>,
}

impl Default for CriteriaWeights {
    /// Seed set for a fresh session. Mutable from there on; discarded with
    /// the session.
    fn default() -> Self {
        Self {
            criteria: vec![
                CriterionWeight {
                    key: "technical".into(),
                    weight: 35.0,
                    label: "Technical skills".into(),
                },
                CriterionWeight {
                    key: "experience".into(),
                    weight: 25.0,
                    label: "Experience".into(),
                },
                CriterionWeight {
                    key: "culture".into(),
                    weight: 20.0,
                    label: "Culture fit".into(),
                },
                CriterionWeight {
                    key: "communication".into(),
                    weight: 20.0,
                    label: "Communication".into(),
                },
            ],
        }
    }
}

impl CriteriaWeights {
    pub fn empty() -> Self {
        Self { criteria: Vec::new() }
    }

    pub fn from_rows(criteria: Vec<CriterionWeight>) -> Self {
        let mut weights = Self::empty();
        for row in criteria {
            weights.upsert(&row.key, row.weight, &row.label);
        }
        weights
    }

    pub fn sum(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    /// Zero active weight means the normalized score is undefined; the
    /// engine degrades to zeroed scores instead of dividing by zero.
    pub fn is_degenerate(&self) -> bool {
        self.sum() <= 0.0
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CriterionWeight> {
        self.criteria.iter()
    }

    pub fn rows(&self) -> &[CriterionWeight] {
        &self.criteria
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.criteria
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.weight)
    }

    /// Insert a new criterion or update an existing one in place, keeping
    /// the user-defined ordering. Negative weights are clamped to zero.
    pub fn upsert(&mut self, key: &str, weight: f64, label: &str) {
        let weight = weight.max(0.0);
        match self.criteria.iter_mut().find(|c| c.key == key) {
            Some(existing) => {
                existing.weight = weight;
                existing.label = label.to_string();
            }
            None => self.criteria.push(CriterionWeight {
                key: key.to_string(),
                weight,
                label: label.to_string(),
            }),
        }
    }

    pub fn set_weight(&mut self, key: &str, weight: f64) -> bool {
        match self.criteria.iter_mut().find(|c| c.key == key) {
            Some(existing) => {
                existing.weight = weight.max(0.0);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.criteria.len();
        self.criteria.retain(|c| c.key != key);
        self.criteria.len() != before
    }
}
