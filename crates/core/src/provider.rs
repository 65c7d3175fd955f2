//! CompletionProvider trait — the abstraction over hosted text-generation
//! backends.
//!
//! The agent loop needs two call shapes: a blocking call returning a complete
//! assistant turn (used for planning) and a streaming call yielding
//! incremental text plus a final assembled turn (used for execution). Both
//! accept a conversation and an optional tool manifest, and both may report
//! tool-call segments in the assembled turn.

use crate::error::ProviderError;
use crate::message::{Message, MessageToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the model so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete (non-streaming) response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated assistant message, including any tool calls and
    /// reasoning trace.
    pub message: Message,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Default)]
pub struct StreamChunk {
    /// Partial visible-text delta
    pub content: Option<String>,

    /// Partial reasoning-trace delta (never shown to the caller as text)
    pub reasoning: Option<String>,

    /// Completed tool calls (delivered once their arguments are assembled)
    pub tool_calls: Vec<MessageToolCall>,

    /// Whether this is the final chunk
    pub done: bool,

    /// Usage info (typically only near the end of the stream)
    pub usage: Option<Usage>,
}

/// The core completion-provider trait.
///
/// The agent loop calls `complete()` for the planning phase and `stream()`
/// for the execution phase without knowing which backend is being used.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Whether this provider requires prior reasoning traces to be replayed
    /// verbatim within the same conversation lineage.
    ///
    /// When `true`, assistant turns appended back into the *same*
    /// conversation keep their `reasoning` field. Reasoning is never carried
    /// across conversations regardless of this flag.
    fn replays_reasoning(&self) -> bool {
        false
    }

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Send a request and get a stream of response chunks.
    ///
    /// The final assembled turn is reconstructed by the caller from the
    /// accumulated chunks. Default implementation calls `complete()` and
    /// wraps the result as a single chunk.
    async fn stream(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>,
        ProviderError,
    > {
        let response = self.complete(request).await?;
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let _ = tx
            .send(Ok(StreamChunk {
                content: Some(response.message.content),
                reasoning: response.message.reasoning,
                tool_calls: response.message.tool_calls,
                done: true,
                usage: response.usage,
            }))
            .await;
        Ok(rx)
    }
}
