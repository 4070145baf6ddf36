//! Configuration and session setup
//!
//! Settings come from the environment. The API key is the only required
//! value; everything else has a default.

use crate::checklist::DuplicatePolicy;
use crate::system_prompt::build_system_instruction;
use crate::tools::ToolSet;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL: &str = "models/gemini-2.0-flash-exp";
const DEFAULT_VOICE: &str = "Puck";
const DEFAULT_HOST: &str = "generativelanguage.googleapis.com";
const LIVE_SERVICE_PATH: &str =
    "ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";

/// Invalid or missing configuration; fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("set GEMINI_API_KEY in the environment")]
    MissingApiKey,
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub port: u16,
    pub model: String,
    pub voice: String,
    pub host: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Browser origins allowed to read the setup and attach the bridge
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = match lookup("LIVE_CHECKLIST_PORT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "LIVE_CHECKLIST_PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let duplicate_policy = match lookup("LIVE_CHECKLIST_ON_DUPLICATE") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: "LIVE_CHECKLIST_ON_DUPLICATE",
                reason,
            })?,
            None => DuplicatePolicy::default(),
        };

        let allowed_origins = match lookup("LIVE_CHECKLIST_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => vec![
                format!("http://localhost:{port}"),
                format!("http://127.0.0.1:{port}"),
            ],
        };
        if allowed_origins.is_empty() {
            return Err(ConfigError::Invalid {
                name: "LIVE_CHECKLIST_ALLOWED_ORIGINS",
                reason: "no origins listed".to_string(),
            });
        }

        Ok(Self {
            api_key,
            port,
            model: lookup("LIVE_CHECKLIST_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            voice: lookup("LIVE_CHECKLIST_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            host: lookup("LIVE_CHECKLIST_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            duplicate_policy,
            allowed_origins,
        })
    }

    /// WebSocket URL of the Live API, including the key
    pub fn live_endpoint(&self) -> String {
        format!("wss://{}/{LIVE_SERVICE_PATH}?key={}", self.host, self.api_key)
    }

    pub fn session_setup(&self) -> SessionSetup {
        SessionSetup {
            model: self.model.clone(),
            generation_config: GenerationConfig {
                response_modalities: "audio".to_string(),
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                },
            },
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: build_system_instruction(),
                }],
            },
            tools: vec![ToolSet::standard()],
        }
    }
}

/// Comma-separated origins, without trailing slashes
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Setup message sent once when the session opens
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSetup {
    pub model: String,
    pub generation_config: GenerationConfig,
    pub system_instruction: SystemInstruction,
    pub tools: Vec<ToolSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: String,
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPart {
    pub text: String,
}
