use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// One user submission. Inputs are kept verbatim; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    id: Uuid,
    reference_transcript: String,
    new_topic: String,
}

impl GenerationRequest {
    pub fn new(
        reference_transcript: impl Into<String>,
        new_topic: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reference_transcript = reference_transcript.into();
        let new_topic = new_topic.into();

        if reference_transcript.trim().is_empty() {
            return Err(ValidationError::EmptyTranscript);
        }
        if new_topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            reference_transcript,
            new_topic,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn reference_transcript(&self) -> &str {
        &self.reference_transcript
    }

    pub fn new_topic(&self) -> &str {
        &self.new_topic
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptAnalysisResult {
    pub analysis: String,
    pub script: String,
}
