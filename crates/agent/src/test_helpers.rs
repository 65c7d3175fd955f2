//! Shared test helpers for agent loop tests.

use crate::runner::{PhaseProfile, RunConfig};
use slugline_core::error::ProviderError;
use slugline_core::message::{Message, MessageToolCall};
use slugline_core::provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, StreamChunk, Usage,
};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue. Once the
/// queue is empty, either panics (the default) or fails with a provider
/// error (`with_failure_after`).
pub struct SequentialMockProvider {
    responses: Mutex<Vec<CompletionResponse>>,
    call_count: Mutex<usize>,
    fail_when_exhausted: bool,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            fail_when_exhausted: false,
        }
    }

    /// Scripted responses, then a network error on the next call.
    pub fn with_failure_after(responses: Vec<CompletionResponse>) -> Self {
        Self {
            fail_when_exhausted: true,
            ..Self::new(responses)
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            if self.fail_when_exhausted {
                return Err(ProviderError::Network("mock provider exhausted".into()));
            }
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

/// A mock provider with scripted `complete()` responses and, separately,
/// scripted chunk sequences for `stream()`.
pub struct ChunkedMockProvider {
    responses: Mutex<Vec<CompletionResponse>>,
    streams: Mutex<Vec<Vec<StreamChunk>>>,
}

impl ChunkedMockProvider {
    pub fn new(responses: Vec<CompletionResponse>, streams: Vec<Vec<StreamChunk>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            streams: Mutex::new(streams),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ChunkedMockProvider {
    fn name(&self) -> &str {
        "chunked_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::Network("no scripted response".into()));
        }
        Ok(responses.remove(0))
    }

    async fn stream(
        &self,
        _request: CompletionRequest,
    ) -> Result<tokio::sync::mpsc::Receiver<Result<StreamChunk, ProviderError>>, ProviderError>
    {
        let chunks = {
            let mut streams = self.streams.lock().unwrap();
            if streams.is_empty() {
                return Err(ProviderError::Network("no scripted stream".into()));
            }
            streams.remove(0)
        };
        let (tx, rx) = tokio::sync::mpsc::channel(chunks.len().max(1));
        for chunk in chunks {
            let _ = tx.send(Ok(chunk)).await;
        }
        Ok(rx)
    }
}

/// A streaming chunk carrying only a text delta.
pub fn text_chunk(text: &str) -> StreamChunk {
    StreamChunk {
        content: Some(text.to_string()),
        ..Default::default()
    }
}

/// Create a simple text response (no tool calls).
pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Create a response with tool calls and accompanying text.
pub fn tool_response(tool_calls: Vec<MessageToolCall>, text: &str) -> CompletionResponse {
    let mut response = text_response(text);
    response.message.tool_calls = tool_calls;
    response
}

/// Helper to create a tool call.
pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}

/// A run config with mock models and the given iteration cap.
pub fn test_run_config(max_iterations: u32) -> RunConfig {
    RunConfig {
        plan: PhaseProfile {
            model: "mock-model".into(),
            temperature: 0.2,
            max_tokens: 2048,
        },
        execute: PhaseProfile {
            model: "mock-model".into(),
            temperature: 0.7,
            max_tokens: 4096,
        },
        max_iterations,
    }
}
