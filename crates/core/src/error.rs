use thiserror::Error;

/// Shown when either form field is blank.
pub const VALIDATION_MESSAGE: &str = "원본 대본과 새로운 주제를 모두 입력해주세요.";

/// Shown for every failure below the UI boundary.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "대본을 생성하는 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("reference transcript is empty")]
    EmptyTranscript,

    #[error("new topic is empty")]
    EmptyTopic,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        VALIDATION_MESSAGE
    }
}

/// Failures of a single generation call.
///
/// Details are kept as strings so the error can be cloned into UI messages. Only
/// [`GenerationError::user_message`] is meant for the end user; `Display` is for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing API key: set {env_var} or API_KEY")]
    MissingApiKey { env_var: String },

    #[error("API request failed: {reason}")]
    Transport { reason: String },

    #[error("{provider} returned HTTP {status}: {body}")]
    Service {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("No response text received from the model")]
    EmptyResponse,

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String },
}

impl GenerationError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Validation(err) => err.user_message(),
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::malformed(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown provider '{name}' (expected gemini, openai or grok)")]
    UnknownProvider { name: String },
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_generation_failure_shares_the_generic_message() {
        let errors = [
            GenerationError::MissingApiKey {
                env_var: "GEMINI_API_KEY".to_string(),
            },
            GenerationError::Transport {
                reason: "connection refused".to_string(),
            },
            GenerationError::Service {
                provider: "Gemini".to_string(),
                status: 429,
                body: "quota".to_string(),
            },
            GenerationError::EmptyResponse,
            GenerationError::malformed("expected value at line 1"),
        ];

        for err in errors {
            assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn validation_keeps_its_own_message() {
        let err = GenerationError::from(ValidationError::EmptyTopic);
        assert_eq!(err.user_message(), VALIDATION_MESSAGE);
    }

    #[test]
    fn log_text_does_not_leak_into_user_message() {
        let err = GenerationError::Transport {
            reason: "dns error: api.example".to_string(),
        };
        assert!(err.to_string().contains("dns error"));
        assert!(!err.user_message().contains("dns"));
    }
}
