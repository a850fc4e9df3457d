//! Settings types. JSON keys are camelCase; every struct fills missing keys
//! from its `Default`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategosSettings {
    pub server: ServerSettings,
    pub generation: GenerationSettings,
    pub chat: ChatSettings,
    pub search: SearchSettings,
    pub directive: DirectiveSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Interval between SSE keep-alive comments.
    pub keep_alive_secs: u64,
    /// Grace period for in-flight streams on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            keep_alive_secs: 15,
            shutdown_timeout_secs: 10,
        }
    }
}

/// Which generation backend adapter to build at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    Gemini,
    Openai,
    /// No backend; sections are filled with deterministic placeholders.
    None,
}

impl LlmProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" => Some(Self::Openai),
            "none" | "placeholder" => Some(Self::None),
            _ => None,
        }
    }

    /// Env vars consulted, in order, for this provider's API key.
    pub fn default_key_env(self) -> Vec<String> {
        match self {
            Self::Gemini => vec!["GOOGLE_API_KEY".into(), "GOOGLE_GENAI_API_KEY".into()],
            Self::Openai => vec!["OPENAI_API_KEY".into()],
            Self::None => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    pub provider: LlmProviderKind,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: Option<u32>,
    /// Override of the vendor API base URL.
    pub base_url: Option<String>,
    /// Env vars holding the API key. Empty means the provider default.
    pub api_key_env: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Gemini,
            model: "gemini-2.5-flash".into(),
            temperature: 0.0,
            max_output_tokens: None,
            base_url: None,
            api_key_env: Vec::new(),
            timeout_secs: 120,
        }
    }
}

impl GenerationSettings {
    pub fn key_env(&self) -> Vec<String> {
        if self.api_key_env.is_empty() {
            self.provider.default_key_env()
        } else {
            self.api_key_env.clone()
        }
    }
}

/// Chat reuses the generation provider and credentials with its own sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// Model for chat turns; `None` reuses the generation model.
    pub model: Option<String>,
    pub temperature: f64,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.2,
            max_output_tokens: Some(400),
            timeout_secs: 60,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    Tavily,
    /// Offline stub results.
    None,
}

impl SearchProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tavily" => Some(Self::Tavily),
            "none" | "stub" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    pub provider: SearchProviderKind,
    pub base_url: Option<String>,
    pub api_key_env: Vec<String>,
    pub topic: String,
    pub search_depth: String,
    pub include_answer: String,
    pub include_raw_content: String,
    pub country: Option<String>,
    pub include_domains: Vec<String>,
    /// Cap on the characters of each serialized result.
    pub max_result_chars: usize,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::Tavily,
            base_url: None,
            api_key_env: vec!["TAVILY_API_KEY".into()],
            topic: "news".into(),
            search_depth: "advanced".into(),
            include_answer: "advanced".into(),
            include_raw_content: "text".into(),
            country: Some("india".into()),
            include_domains: vec![
                "https://indiankanoon.org/".into(),
                "https://www.indiacode.nic.in/".into(),
            ],
            max_result_chars: 4000,
            timeout_secs: 30,
        }
    }
}

pub const DEFAULT_INSTRUCTION: &str = "User will give you all info about the case. Analyse it thoroughly and explain each and every point in detail. Highlight important points.";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectiveSettings {
    /// Instruction used when a request carries none.
    pub default_instruction: String,
    pub pacing: PacingSettings,
}

impl Default for DirectiveSettings {
    fn default() -> Self {
        Self {
            default_instruction: DEFAULT_INSTRUCTION.into(),
            pacing: PacingSettings::default(),
        }
    }
}

/// Delays inserted between emitted chunks so transports flush incrementally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PacingSettings {
    pub line_delay_ms: u64,
    pub query_delay_ms: u64,
    pub tool_result_line_delay_ms: u64,
    pub search_delay_ms: u64,
    pub section_delay_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            line_delay_ms: 10,
            query_delay_ms: 5,
            tool_result_line_delay_ms: 5,
            search_delay_ms: 10,
            section_delay_ms: 50,
        }
    }
}

impl PacingSettings {
    /// No delays at all; chunks still yield to the scheduler.
    pub fn immediate() -> Self {
        Self {
            line_delay_ms: 0,
            query_delay_ms: 0,
            tool_result_line_delay_ms: 0,
            search_delay_ms: 0,
            section_delay_ms: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Per-module level overrides, e.g. `{"strategos_llm": "debug"}`.
    pub module_levels: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            module_levels: BTreeMap::new(),
        }
    }
}
