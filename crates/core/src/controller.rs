//! Request lifecycle: `Idle -> Loading -> Success | Error`, re-entered on every valid
//! submission.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    client::GenerationProvider,
    error::{GenerationError, ValidationError},
    types::{GenerationRequest, ScriptAnalysisResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(ScriptAnalysisResult),
    /// User-facing message only.
    Error(String),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

/// Owns the [`RequestState`] and drives the injected [`GenerationProvider`].
///
/// State is published through a `watch` channel so renderers and tests can observe it
/// without holding the controller.
pub struct RequestController {
    provider: Arc<dyn GenerationProvider>,
    state: watch::Sender<RequestState>,
    validation_error: Option<&'static str>,
    in_flight: Option<Uuid>,
}

impl RequestController {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            provider,
            state,
            validation_error: None,
            in_flight: None,
        }
    }

    pub fn provider(&self) -> Arc<dyn GenerationProvider> {
        Arc::clone(&self.provider)
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), RequestState::Loading)
    }

    pub fn validation_error(&self) -> Option<&'static str> {
        self.validation_error
    }

    /// Validate the form and, if both fields are filled, enter `Loading`.
    ///
    /// On a validation failure the visible state is left as it was and only the validation
    /// message is set. Loading while a request is already in flight is not refused here;
    /// the newer request supersedes the older one (see [`complete`](Self::complete)).
    pub fn begin(
        &mut self,
        reference_transcript: &str,
        new_topic: &str,
    ) -> Result<GenerationRequest, ValidationError> {
        let request = match GenerationRequest::new(reference_transcript, new_topic) {
            Ok(request) => request,
            Err(err) => {
                debug!(state = self.state.borrow().name(), reason = %err, "submission rejected");
                self.validation_error = Some(err.user_message());
                return Err(err);
            }
        };

        self.validation_error = None;
        self.in_flight = Some(request.id());
        self.transition(RequestState::Loading);
        info!(request_id = %request.id(), "generation started");

        Ok(request)
    }

    /// Resolve the request begun with `request_id`.
    ///
    /// Returns `false` and leaves the state untouched when `request_id` is not the latest
    /// request begun.
    pub fn complete(
        &mut self,
        request_id: Uuid,
        outcome: Result<ScriptAnalysisResult, GenerationError>,
    ) -> bool {
        if self.in_flight != Some(request_id) {
            debug!(%request_id, "ignoring stale generation result");
            return false;
        }
        self.in_flight = None;

        let next = match outcome {
            Ok(result) => RequestState::Success(result),
            Err(err) => {
                debug!(%request_id, error = %err, "generation ended in error");
                RequestState::Error(err.user_message().to_string())
            }
        };
        info!(%request_id, state = next.name(), "generation finished");
        self.transition(next);

        true
    }

    /// [`begin`](Self::begin), call the provider, then [`complete`](Self::complete).
    pub async fn submit(&mut self, reference_transcript: &str, new_topic: &str) -> RequestState {
        let Ok(request) = self.begin(reference_transcript, new_topic) else {
            return self.state();
        };

        let outcome = self.provider.generate(&request).await;
        self.complete(request.id(), outcome);
        self.state()
    }

    fn transition(&self, next: RequestState) {
        self.state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{GENERIC_FAILURE_MESSAGE, VALIDATION_MESSAGE},
        mock::ScriptedProvider,
    };

    fn controller() -> (RequestController, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new());
        (RequestController::new(provider.clone()), provider)
    }

    fn result(analysis: &str, script: &str) -> ScriptAnalysisResult {
        ScriptAnalysisResult {
            analysis: analysis.to_string(),
            script: script.to_string(),
        }
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_provider() {
        let (mut controller, provider) = controller();

        for (transcript, topic) in [("", "X"), ("   ", "X"), ("text", ""), ("text", "\n\t")] {
            let state = controller.submit(transcript, topic).await;
            assert_eq!(state, RequestState::Idle);
            assert_eq!(controller.validation_error(), Some(VALIDATION_MESSAGE));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn success_holds_the_exact_pair() {
        let (mut controller, provider) = controller();
        provider.push_ok("강한 후킹", "Hook...\nBody...\nOutro...");

        let state = controller.submit("안녕하세요 오늘은...", "스마트스토어 창업").await;

        assert_eq!(
            state,
            RequestState::Success(result("강한 후킹", "Hook...\nBody...\nOutro..."))
        );
        assert_eq!(controller.validation_error(), None);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn empty_and_malformed_output_become_the_generic_error() {
        let (mut controller, provider) = controller();
        provider
            .push_raw(Some(""))
            .push_raw(Some("{not json"))
            .push_raw(Some(r#"{"analysis":"x"}"#));

        for _ in 0..3 {
            let state = controller.submit("t", "n").await;
            assert_eq!(state, RequestState::Error(GENERIC_FAILURE_MESSAGE.to_string()));
        }
    }

    #[tokio::test]
    async fn new_success_replaces_previous_result() {
        let (mut controller, provider) = controller();
        provider
            .push_ok("first analysis", "first script")
            .push_err(GenerationError::Transport {
                reason: "reset".to_string(),
            })
            .push_ok("second analysis", "second script");

        controller.submit("t", "n").await;
        assert!(matches!(controller.state(), RequestState::Error(_)));
        let state = controller.submit("t", "n").await;

        assert_eq!(
            state,
            RequestState::Success(result("second analysis", "second script"))
        );
    }

    #[tokio::test]
    async fn validation_failure_keeps_the_visible_result() {
        let (mut controller, provider) = controller();
        provider.push_ok("a", "s");
        controller.submit("t", "n").await;

        let state = controller.submit("t", " ").await;

        assert_eq!(state, RequestState::Success(result("a", "s")));
        assert_eq!(controller.validation_error(), Some(VALIDATION_MESSAGE));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn begin_enters_loading_and_clears_validation() {
        let (mut controller, _) = controller();
        assert!(controller.begin("", "").is_err());
        assert!(controller.validation_error().is_some());

        controller.begin("t", "n").unwrap();

        assert!(controller.is_loading());
        assert_eq!(controller.validation_error(), None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let (mut controller, _) = controller();
        let first = controller.begin("t", "first").unwrap();
        let second = controller.begin("t", "second").unwrap();

        assert!(!controller.complete(first.id(), Ok(result("old", "old"))));
        assert!(controller.is_loading());

        assert!(controller.complete(second.id(), Ok(result("new", "new"))));
        assert_eq!(controller.state(), RequestState::Success(result("new", "new")));
    }

    #[tokio::test]
    async fn subscribers_observe_every_transition() {
        let (mut controller, provider) = controller();
        provider.push_ok("a", "s");
        let mut rx = controller.subscribe();
        assert_eq!(*rx.borrow_and_update(), RequestState::Idle);

        let request = controller.begin("t", "n").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), RequestState::Loading);

        let outcome = controller.provider().generate(&request).await;
        controller.complete(request.id(), outcome);
        assert_eq!(*rx.borrow_and_update(), RequestState::Success(result("a", "s")));
    }
}
