use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageType {
    Email,
    Linkedin,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Professional,
    Friendly,
    Casual,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageLength {
    Short,
    Medium,
    Long,
}

/// Per-request message configuration chosen by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachRequestConfig {
    pub message_type: MessageType,
    pub tone: Tone,
    pub length: MessageLength,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl Default for OutreachRequestConfig {
    fn default() -> Self {
        Self {
            message_type: MessageType::Email,
            tone: Tone::Professional,
            length: MessageLength::Medium,
            custom_instructions: None,
        }
    }
}

/// Process-level generation settings. The timeout and retry knobs apply to
/// whatever external backend is wired in; the template path ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct OutreachRuntimeConfig {
    pub enabled: bool,
    pub backend: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for OutreachRuntimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: "template".into(),
            timeout_secs: 20,
            max_retries: 2,
        }
    }
}

impl OutreachRuntimeConfig {
    pub fn from_env() -> Self {
        fn parse_bool(key: &str, default: bool) -> bool {
            match std::env::var(key) {
                Ok(value) => matches!(
                    value.to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                ),
                Err(_) => default,
            }
        }

        fn parse_u64(key: &str, default: u64) -> u64 {
            std::env::var(key)
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(default)
        }

        fn parse_u32(key: &str, default: u32) -> u32 {
            std::env::var(key)
                .ok()
                .and_then(|raw| raw.parse::<u32>().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();

        Self {
            enabled: parse_bool("TD_OUTREACH_ENABLED", defaults.enabled),
            backend: std::env::var("TD_OUTREACH_BACKEND").unwrap_or(defaults.backend),
            timeout_secs: parse_u64("TD_OUTREACH_TIMEOUT_SECONDS", defaults.timeout_secs),
            max_retries: parse_u32("TD_OUTREACH_MAX_RETRIES", defaults.max_retries),
        }
    }
}
