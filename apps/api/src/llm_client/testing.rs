//! Scripted backend for tests: replays queued replies and records requests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CompletionBackend, CompletionRequest, LlmClient, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub json_output: bool,
}

/// What the next call should produce.
pub enum Scripted {
    Reply(String),
    Fail(fn() -> LlmError),
}

#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedBackend {
    pub fn replying(replies: &[&str]) -> Arc<Self> {
        let backend = Self::default();
        backend
            .script
            .lock()
            .unwrap()
            .extend(replies.iter().map(|r| Scripted::Reply(r.to_string())));
        Arc::new(backend)
    }

    pub fn failing(make_error: fn() -> LlmError) -> Arc<Self> {
        let backend = Self::default();
        backend
            .script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(make_error));
        Arc::new(backend)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>) -> LlmClient {
        LlmClient::new(self.clone())
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            temperature: request.temperature,
            json_output: request.json_output,
        });
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(make_error)) => Err(make_error()),
            None => Err(LlmError::EmptyContent),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
