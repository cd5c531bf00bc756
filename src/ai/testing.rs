//! Scripted model backend for unit tests

use crate::ai::error::{AIError, AIResult};
use crate::ai::provider::{AIProvider, CompletionRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers every call
#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Fail(AIError),
    Panic(String),
}

/// Mock provider that returns a fixed reply (or error) and records requests
#[derive(Debug)]
pub struct MockAIProvider {
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: Mutex<Vec<CompletionRequest>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockAIProvider {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Provider answering every request with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Reply(reply.into()))
    }

    /// Provider failing every request with an authentication error
    pub fn failing() -> Self {
        Self::failing_with(AIError::auth_failure("Mock"))
    }

    pub fn failing_with(error: AIError) -> Self {
        Self::with_behavior(MockBehavior::Fail(error))
    }

    /// Provider that panics inside every call
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Panic(message.into()))
    }

    /// Hold every call open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of calls that were open at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> AIResult<String> {
        self.calls.lock().unwrap().push(request.clone());

        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(open, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Reply(reply) => Ok(reply.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
            MockBehavior::Panic(message) => panic!("{}", message),
        }
    }
}
