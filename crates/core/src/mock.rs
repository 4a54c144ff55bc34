use std::{
    collections::VecDeque,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    client::{GenerationProvider, parse_script_analysis},
    error::{GenerationError, Result},
    types::{GenerationRequest, ScriptAnalysisResult},
};

/// Deterministic [`GenerationProvider`] that replays queued outcomes in order and records
/// every request it receives.
///
/// Raw model text can be queued with [`ScriptedProvider::push_raw`]; it goes through the same
/// parser the network client uses. Once the queue is drained every call fails with
/// [`GenerationError::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<ScriptAnalysisResult>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, analysis: impl Into<String>, script: impl Into<String>) -> &Self {
        self.push(Ok(ScriptAnalysisResult {
            analysis: analysis.into(),
            script: script.into(),
        }))
    }

    pub fn push_raw(&self, text: Option<&str>) -> &Self {
        self.push(parse_script_analysis(text))
    }

    pub fn push_err(&self, err: GenerationError) -> &Self {
        self.push(Err(err))
    }

    fn push(&self, outcome: Result<ScriptAnalysisResult>) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ScriptAnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}
