use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

/// How a provider expects the request body and where it puts the answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    /// `models/{model}:generateContent` with `responseSchema`
    GeminiGenerateContent,
    /// OpenAI-style `chat/completions` with a strict `json_schema` response format
    ChatCompletions,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
    pub wire: WireFormat,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/models",
                model: "gemini-2.5-flash",
                env_var: "GEMINI_API_KEY",
                wire: WireFormat::GeminiGenerateContent,
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
                wire: WireFormat::ChatCompletions,
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
                wire: WireFormat::ChatCompletions,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::Openai),
            "grok" | "xai" => Ok(Provider::Grok),
            _ => Err(ConfigError::UnknownProvider {
                name: s.to_string(),
            }),
        }
    }
}
