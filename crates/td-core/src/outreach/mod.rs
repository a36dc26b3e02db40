pub mod config;
pub mod generator;
pub mod template;

pub use config::{
    MessageLength, MessageType, OutreachRequestConfig, OutreachRuntimeConfig, Tone,
};
pub use generator::{OutreachError, OutreachGenerator, OutreachMessage};
pub use template::{render_template, RenderedTemplate};

use thiserror::Error;
use tracing::warn;

use crate::{CandidateRecord, SenderProfile};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("generation backend timed out after {0}s")]
    Timeout(u64),
    #[error("generation backend rejected the request: {0}")]
    Rejected(String),
    #[error("generation backend returned a malformed payload: {0}")]
    MalformedResponse(String),
}

/// Draft returned by a generation backend before the generator attaches its
/// bookkeeping fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDraft {
    pub subject: String,
    pub body: String,
    pub personalization_tags: Vec<String>,
}

/// External message-generation collaborator.
///
/// `name()` is recorded as `OutreachMessage.source` so regenerated messages
/// can be traced back to the backend that produced them. Any error from
/// `generate` downgrades that candidate to the local template; it is never
/// fatal and never drops the candidate.
pub trait OutreachBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        candidate: &CandidateRecord,
        request: &OutreachRequestConfig,
        sender: &SenderProfile,
    ) -> Result<GeneratedDraft, BackendError>;
}

/// Wraps the fallback renderer as a first-class backend so the service runs
/// without an external collaborator configured.
pub struct TemplateBackend;

impl OutreachBackend for TemplateBackend {
    fn name(&self) -> &'static str {
        "template"
    }

    fn generate(
        &self,
        candidate: &CandidateRecord,
        request: &OutreachRequestConfig,
        sender: &SenderProfile,
    ) -> Result<GeneratedDraft, BackendError> {
        let rendered = render_template(candidate, sender, request);
        Ok(GeneratedDraft {
            subject: rendered.subject,
            body: rendered.body,
            personalization_tags: rendered.personalization_tags,
        })
    }
}

/// Backend factory. Unknown names fall back to the template backend so a
/// misconfigured deployment still produces messages.
pub fn create_backend(name: &str) -> Box<dyn OutreachBackend> {
    match name {
        "template" => Box::new(TemplateBackend),
        other => {
            warn!(backend = other, "unknown outreach backend; using template");
            Box::new(TemplateBackend)
        }
    }
}
