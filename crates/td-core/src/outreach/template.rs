use super::config::{MessageLength, MessageType, OutreachRequestConfig, Tone};
use crate::{CandidateRecord, SenderProfile};

/// Opening phrase per tone. Table-driven so the renderer stays a straight
/// pipeline of clauses.
const TONE_OPENINGS: &[(Tone, &str)] = &[
    (Tone::Professional, "I hope this message finds you well."),
    (Tone::Friendly, "Hope you're having a great week!"),
    (Tone::Casual, "I'll keep this quick."),
    (
        Tone::Direct,
        "I'm reaching out about a specific opportunity.",
    ),
];

/// Which optional sections each verbosity tier includes.
#[derive(Debug, Clone, Copy)]
struct LengthTier {
    role_pitch: bool,
    logistics: bool,
}

const LENGTH_TIERS: &[(MessageLength, LengthTier)] = &[
    (
        MessageLength::Short,
        LengthTier {
            role_pitch: false,
            logistics: false,
        },
    ),
    (
        MessageLength::Medium,
        LengthTier {
            role_pitch: true,
            logistics: false,
        },
    ),
    (
        MessageLength::Long,
        LengthTier {
            role_pitch: true,
            logistics: true,
        },
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
    /// Audit trail of which source fields were interpolated.
    pub personalization_tags: Vec<String>,
}

fn opening(tone: Tone) -> &'static str {
    TONE_OPENINGS
        .iter()
        .find(|(candidate, _)| *candidate == tone)
        .map(|(_, text)| *text)
        .unwrap_or("")
}

fn tier(length: MessageLength) -> LengthTier {
    LENGTH_TIERS
        .iter()
        .find(|(candidate, _)| *candidate == length)
        .map(|(_, tier)| *tier)
        .unwrap_or(LengthTier {
            role_pitch: true,
            logistics: false,
        })
}

/// Deterministic local message rendering: a pure function of candidate and
/// sender fields. Clauses whose source field is absent are omitted outright
/// so no empty placeholder ever reaches the rendered text.
///
/// Custom instructions are intentionally not interpolated here; they are
/// directives for the external generator, not message copy.
pub fn render_template(
    candidate: &CandidateRecord,
    sender: &SenderProfile,
    config: &OutreachRequestConfig,
) -> RenderedTemplate {
    let mut tags: Vec<String> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();

    let first_name = candidate
        .name
        .split_whitespace()
        .next()
        .unwrap_or(candidate.name.as_str());
    paragraphs.push(format!("Hi {first_name},"));
    tags.push("name".into());

    let mut intro = vec![opening(config.tone).to_string()];
    if let Some(hook) = background_hook(candidate, &mut tags) {
        intro.push(hook);
    }
    paragraphs.push(intro.join(" "));

    let tier = tier(config.length);

    if tier.role_pitch {
        if let Some(pitch) = role_pitch(sender, &mut tags) {
            paragraphs.push(pitch);
        }
    }

    if tier.logistics {
        if let Some(logistics) = logistics_line(sender, &mut tags) {
            paragraphs.push(logistics);
        }
    }

    paragraphs.push(call_to_action(config.message_type).to_string());

    if let Some(name) = sender.sender_name.as_deref() {
        paragraphs.push(format!("Best regards,\n{name}"));
        tags.push("sender_name".into());
    }

    RenderedTemplate {
        subject: subject_line(candidate, sender),
        body: paragraphs.join("\n\n"),
        personalization_tags: tags,
    }
}

/// One sentence on what stood out: skills first, then the current role.
fn background_hook(candidate: &CandidateRecord, tags: &mut Vec<String>) -> Option<String> {
    if !candidate.skills.is_empty() {
        tags.push("skills".into());
        let highlighted = candidate
            .skills
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        return Some(match (candidate.title.as_deref(), candidate.company.as_deref()) {
            (Some(title), Some(company)) => {
                tags.push("title".into());
                tags.push("company".into());
                format!(
                    "Your experience with {highlighted} as {title} at {company} stood out to us."
                )
            }
            (Some(title), None) => {
                tags.push("title".into());
                format!("Your experience with {highlighted} as {title} stood out to us.")
            }
            _ => format!("Your experience with {highlighted} stood out to us."),
        });
    }

    candidate.title.as_deref().map(|title| {
        tags.push("title".into());
        format!("Your background as {title} stood out to us.")
    })
}

fn role_pitch(sender: &SenderProfile, tags: &mut Vec<String>) -> Option<String> {
    let company = sender.company.as_deref()?;
    tags.push("sender_company".into());

    let mut pitch = match sender.industry.as_deref() {
        Some(industry) => {
            tags.push("sender_industry".into());
            format!("We're growing the {industry} team at {company}")
        }
        None => format!("We're growing the team at {company}"),
    };

    if !sender.departments.is_empty() {
        tags.push("departments".into());
        pitch.push_str(&format!(
            " and hiring across {}",
            sender.departments.join(", ")
        ));
    }

    pitch.push('.');
    Some(pitch)
}

fn logistics_line(sender: &SenderProfile, tags: &mut Vec<String>) -> Option<String> {
    if sender.locations.is_empty() {
        return None;
    }
    tags.push("locations".into());
    Some(format!(
        "The role can be based in {}.",
        sender.locations.join(", ")
    ))
}

fn call_to_action(message_type: MessageType) -> &'static str {
    match message_type {
        MessageType::Email => "Would you be open to a short intro call next week?",
        MessageType::Linkedin => "Would you be open to connecting to hear more?",
        MessageType::Twitter => "Open to a quick DM exchange about it?",
    }
}

fn subject_line(candidate: &CandidateRecord, sender: &SenderProfile) -> String {
    match (candidate.skills.first(), sender.company.as_deref()) {
        (Some(skill), Some(company)) => format!("Your {skill} experience + {company}"),
        (Some(skill), None) => format!("A role that matches your {skill} experience"),
        (None, Some(company)) => format!("An opportunity at {company}"),
        (None, None) => "An opportunity we think fits you".to_string(),
    }
}
