//! Generation backend abstraction.
//!
//! The core talks to exactly one backend operation: `complete` an ordered
//! message list against a named model. Fault causes (network, quota, rate
//! limit) are surfaced distinctly for logging but the generation guard
//! treats them identically for retry purposes.

pub mod openrouter;

use crate::error::LlmError;
use crate::types::ChatTurn;
use async_trait::async_trait;

pub use openrouter::OpenRouterBackend;

/// A chat-completion backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete the given messages with the named model, returning the
    /// generated text.
    async fn complete(&self, messages: &[ChatTurn], model: &str) -> Result<String, LlmError>;
}

/// An in-memory backend for tests: returns queued outcomes in order and
/// records which models were asked.
#[derive(Default)]
pub struct MockBackend {
    outcomes: std::sync::Mutex<std::collections::VecDeque<Result<String, LlmError>>>,
    calls: std::sync::Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that always replies with the given text.
    pub fn with_reply(text: &str) -> Self {
        let backend = Self::new();
        for _ in 0..20 {
            backend.queue_ok(text);
        }
        backend
    }

    /// Queue a successful completion.
    pub fn queue_ok(&self, text: &str) {
        self.outcomes
            .lock()
            .expect("mock outcomes lock")
            .push_back(Ok(text.to_string()));
    }

    /// Queue a failed completion.
    pub fn queue_err(&self, error: LlmError) {
        self.outcomes
            .lock()
            .expect("mock outcomes lock")
            .push_back(Err(error));
    }

    /// The model identifiers passed to `complete`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock calls lock").clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, _messages: &[ChatTurn], model: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .expect("mock calls lock")
            .push(model.to_string());
        self.outcomes
            .lock()
            .expect("mock outcomes lock")
            .pop_front()
            .unwrap_or_else(|| Ok("mock reply".to_string()))
    }
}
