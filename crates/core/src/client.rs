use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::{
    config::Settings,
    error::{GenerationError, Result},
    prompt::{
        SYSTEM_INSTRUCTION, TEMPERATURE, build_prompt, gemini_response_schema,
        json_response_schema,
    },
    provider::WireFormat,
    types::{GenerationRequest, ScriptAnalysisResult},
};

/// Something that can turn a [`GenerationRequest`] into a [`ScriptAnalysisResult`].
///
/// The network-backed [`GenerationClient`] is the production implementation;
/// [`crate::mock::ScriptedProvider`] stands in for it in tests.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Exactly one outbound call per invocation. No retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<ScriptAnalysisResult>;

    /// Validate both inputs, then [`generate`](Self::generate).
    async fn generate_script(
        &self,
        reference_transcript: &str,
        new_topic: &str,
    ) -> Result<ScriptAnalysisResult> {
        let request = GenerationRequest::new(reference_transcript, new_topic)?;
        self.generate(&request).await
    }
}

/// Parse the model's raw text into a result.
///
/// Missing or blank text is [`GenerationError::EmptyResponse`]; anything that is not a JSON
/// object with string `analysis` and `script` fields is
/// [`GenerationError::MalformedResponse`].
pub fn parse_script_analysis(text: Option<&str>) -> Result<ScriptAnalysisResult> {
    let text = text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(GenerationError::EmptyResponse)?;

    Ok(serde_json::from_str(text)?)
}

pub struct GenerationClient {
    http: reqwest::Client,
    settings: Settings,
}

impl GenerationClient {
    pub fn new(settings: Settings) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings)
    }

    pub fn with_http_client(http: reqwest::Client, settings: Settings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn wire(&self) -> WireFormat {
        self.settings.provider.config().wire
    }

    pub fn endpoint(&self) -> String {
        match self.wire() {
            WireFormat::GeminiGenerateContent => format!(
                "{}/{}:generateContent",
                self.settings.api_url.trim_end_matches('/'),
                self.settings.model
            ),
            WireFormat::ChatCompletions => self.settings.api_url.clone(),
        }
    }

    pub fn request_body(&self, request: &GenerationRequest) -> Value {
        let prompt = build_prompt(request);

        match self.wire() {
            WireFormat::GeminiGenerateContent => json!({
                "systemInstruction": {
                    "parts": [{ "text": SYSTEM_INSTRUCTION }],
                },
                "contents": [
                    {
                        "role": "user",
                        "parts": [{ "text": prompt }],
                    },
                ],
                "generationConfig": {
                    "temperature": TEMPERATURE,
                    "responseMimeType": "application/json",
                    "responseSchema": gemini_response_schema(),
                },
            }),
            WireFormat::ChatCompletions => json!({
                "model": self.settings.model,
                "messages": [
                    {
                        "role": "system",
                        "content": SYSTEM_INSTRUCTION,
                    },
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": TEMPERATURE,
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "script_analysis",
                        "strict": true,
                        "schema": json_response_schema(),
                    },
                },
            }),
        }
    }

    /// Send the request and pull the model's text out of the provider envelope.
    async fn fetch_text(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let api_key = self.settings.require_api_key()?;
        let wire = self.wire();

        let builder = self
            .http
            .post(self.endpoint())
            .header("Content-Type", "application/json");
        let builder = match wire {
            WireFormat::GeminiGenerateContent => builder.header("x-goog-api-key", api_key),
            WireFormat::ChatCompletions => builder.bearer_auth(api_key),
        };

        let response = builder.json(&self.request_body(request)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Service {
                provider: self.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = match wire {
            WireFormat::GeminiGenerateContent => {
                serde_json::from_str::<GeminiResponse>(&body)?.into_text()
            }
            WireFormat::ChatCompletions => {
                serde_json::from_str::<ChatCompletionResponse>(&body)?.into_text()
            }
        };
        Ok(text)
    }
}

#[async_trait]
impl GenerationProvider for GenerationClient {
    fn name(&self) -> &str {
        self.settings.provider.name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ScriptAnalysisResult> {
        info!(
            request_id = %request.id(),
            provider = self.name(),
            model = %self.settings.model,
            transcript_chars = request.reference_transcript().chars().count(),
            "requesting script generation"
        );

        let outcome = match self.fetch_text(request).await {
            Ok(text) => parse_script_analysis(text.as_deref()),
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(result) => info!(
                request_id = %request.id(),
                analysis_chars = result.analysis.chars().count(),
                script_chars = result.script.chars().count(),
                "script generated"
            ),
            Err(err) => error!(
                request_id = %request.id(),
                provider = self.name(),
                error = %err,
                "script generation failed"
            ),
        }

        outcome
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Text parts of the first candidate, concatenated.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!(finish_reason = %reason, "gemini candidate finished");
        }

        let texts: Vec<String> = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
