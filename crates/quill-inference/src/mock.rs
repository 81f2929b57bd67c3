//! Mock completion backend for deterministic testing.
//!
//! Records every prompt it receives so tests can assert on call counts
//! (mutual exclusion, empty-document guard) and can be configured to fail
//! with a specific error class (quota, credential, permission).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quill_core::{CompletionBackend, Error, Result};

/// Failure class a [`MockCompletion`] can be configured to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Quota,
    InvalidCredential,
    PermissionDenied,
    Upstream,
}

impl MockFailure {
    fn into_error(self) -> Error {
        match self {
            MockFailure::Quota => {
                Error::QuotaExceeded("Gemini API quota exceeded (simulated)".to_string())
            }
            MockFailure::InvalidCredential => {
                Error::Unauthorized("Invalid Gemini API key (simulated)".to_string())
            }
            MockFailure::PermissionDenied => {
                Error::Forbidden("Permission denied (simulated)".to_string())
            }
            MockFailure::Upstream => Error::Inference("simulated upstream failure".to_string()),
        }
    }
}

/// Mock completion backend.
#[derive(Clone)]
pub struct MockCompletion {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<String>>>,
}

struct MockConfig {
    fixed_responses: HashMap<String, String>,
    default_response: String,
    latency_ms: u64,
    failure: Option<MockFailure>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fixed_responses: HashMap::new(),
            default_response: " and the story continues.".to_string(),
            latency_ms: 0,
            failure: None,
        }
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for unmatched prompts.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::get_mut(&mut self.config)
            .expect("configure before cloning")
            .default_response = response.into();
        self
    }

    /// Add a response mapping for a specific prompt.
    pub fn with_response_mapping(
        mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::get_mut(&mut self.config)
            .expect("configure before cloning")
            .fixed_responses
            .insert(prompt.into(), response.into());
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::get_mut(&mut self.config)
            .expect("configure before cloning")
            .latency_ms = latency_ms;
        self
    }

    /// Make every call fail with the given failure class.
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        Arc::get_mut(&mut self.config)
            .expect("configure before cloning")
            .failure = Some(failure);
        self
    }

    /// All prompts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of completion calls received.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(prompt.to_string());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(failure) = self.config.failure {
            return Err(failure.into_error());
        }

        Ok(self
            .config
            .fixed_responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logs_every_call() {
        let mock = MockCompletion::new();
        mock.complete("first").await.unwrap();
        mock.complete("second").await.unwrap();
        assert_eq!(mock.calls(), vec!["first", "second"]);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn response_mapping_wins_over_default() {
        let mock = MockCompletion::new()
            .with_fixed_response(" default")
            .with_response_mapping("the end", " is near.");
        assert_eq!(mock.complete("the end").await.unwrap(), " is near.");
        assert_eq!(mock.complete("anything else").await.unwrap(), " default");
    }

    #[tokio::test]
    async fn configured_failure_is_returned() {
        let mock = MockCompletion::new().with_failure(MockFailure::Quota);
        match mock.complete("prompt").await {
            Err(Error::QuotaExceeded(_)) => {}
            other => panic!("expected QuotaExceeded, got {:?}", other),
        }
        // The call is still logged.
        assert_eq!(mock.call_count(), 1);
    }
}
