use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::config::{MessageType, OutreachRequestConfig};
use super::template::render_template;
use super::{GeneratedDraft, OutreachBackend, TemplateBackend};
use crate::{CandidateId, CandidateRecord, SenderProfile};

/// Base response-rate estimate per channel. A small lift per interpolated
/// field is added on top, capped well below certainty.
const CHANNEL_BASE_RATES: &[(MessageType, f64)] = &[
    (MessageType::Email, 0.32),
    (MessageType::Linkedin, 0.28),
    (MessageType::Twitter, 0.12),
];

const PERSONALIZATION_LIFT: f64 = 0.03;
const RESPONSE_RATE_CAP: f64 = 0.65;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutreachError {
    #[error("no candidates selected for outreach")]
    NoCandidatesSelected,
}

/// One generated message. Never mutated after creation; regeneration
/// produces a new record that replaces the map entry for the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachMessage {
    pub candidate_id: CandidateId,
    pub message_type: MessageType,
    pub subject: String,
    pub body: String,
    /// Audit trail of which fields were customized.
    pub personalization_tags: Vec<String>,
    pub estimated_response_rate: f64,
    /// Backend that produced the text ("template" on the fallback path).
    pub source: String,
    pub generated_at: DateTime<Utc>,
}

pub struct OutreachGenerator {
    backend: Box<dyn OutreachBackend>,
}

impl OutreachGenerator {
    pub fn new(backend: Box<dyn OutreachBackend>) -> Self {
        Self { backend }
    }

    pub fn template_only() -> Self {
        Self::new(Box::new(TemplateBackend))
    }

    /// One message per candidate, keyed by id.
    ///
    /// Fails fast only on an empty input. A backend failure for any single
    /// candidate downgrades that candidate to the deterministic template;
    /// no candidate is ever left without a message.
    pub fn generate(
        &self,
        candidates: &[CandidateRecord],
        request: &OutreachRequestConfig,
        sender: &SenderProfile,
    ) -> Result<HashMap<CandidateId, OutreachMessage>, OutreachError> {
        if candidates.is_empty() {
            return Err(OutreachError::NoCandidatesSelected);
        }

        let mut messages = HashMap::with_capacity(candidates.len());
        for candidate in candidates {
            // Inserting an already-present id overwrites it, which is the
            // regeneration contract; duplicate input ids collapse the same
            // way (last writer wins).
            messages.insert(candidate.id.clone(), self.generate_one(candidate, request, sender));
        }

        Ok(messages)
    }

    fn generate_one(
        &self,
        candidate: &CandidateRecord,
        request: &OutreachRequestConfig,
        sender: &SenderProfile,
    ) -> OutreachMessage {
        let (draft, source) = match self.backend.generate(candidate, request, sender) {
            Ok(draft) => (draft, self.backend.name()),
            Err(err) => {
                warn!(
                    candidate_id = %candidate.id,
                    backend = self.backend.name(),
                    error = %err,
                    "generation backend failed; falling back to template"
                );
                let rendered = render_template(candidate, sender, request);
                (
                    GeneratedDraft {
                        subject: rendered.subject,
                        body: rendered.body,
                        personalization_tags: rendered.personalization_tags,
                    },
                    "template",
                )
            }
        };

        OutreachMessage {
            candidate_id: candidate.id.clone(),
            message_type: request.message_type,
            estimated_response_rate: estimate_response_rate(
                request.message_type,
                draft.personalization_tags.len(),
            ),
            subject: draft.subject,
            body: draft.body,
            personalization_tags: draft.personalization_tags,
            source: source.to_string(),
            generated_at: Utc::now(),
        }
    }
}

fn estimate_response_rate(message_type: MessageType, personalization_count: usize) -> f64 {
    let base = CHANNEL_BASE_RATES
        .iter()
        .find(|(candidate, _)| *candidate == message_type)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.2);

    (base + PERSONALIZATION_LIFT * personalization_count as f64).min(RESPONSE_RATE_CAP)
}
