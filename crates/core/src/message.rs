//! Message domain types.
//!
//! These are the value objects that flow through the agent loop: the caller's
//! request history, the assistant's turns (with any tool calls), and tool
//! results fed back into the conversation.
//!
//! The loop keeps two independent message sequences per run — one for the
//! planning call and one for execution — so a `Conversation` wrapper type is
//! deliberately absent; a `Vec<Message>` owned by the run is the whole model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (voice, rules)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Provider-internal reasoning trace attached to an assistant turn.
    ///
    /// Only meaningful when the provider that produced it requires prior
    /// reasoning to be replayed verbatim within the same conversation
    /// lineage (see `CompletionProvider::replays_reasoning`). Never copied
    /// between conversations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            reasoning: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::new(Role::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }
}

/// A tool call embedded in an assistant message, as the provider emitted it.
///
/// Arguments are kept as the raw JSON string because streaming providers
/// deliver them as partial-JSON deltas that are concatenated before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Make the opening punchier.");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Make the opening punchier.");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.reasoning.is_none());
    }

    #[test]
    fn tool_result_carries_call_id() {
        let msg = Message::tool_result("toolu_42", "Scene updated");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("toolu_42"));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let mut msg = Message::assistant("Rewriting scene 2");
        msg.tool_calls.push(MessageToolCall {
            id: "call_1".into(),
            name: "edit_scene".into(),
            arguments: r#"{"find":"Hello."}"#.into(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, "Rewriting scene 2");
        assert_eq!(back.tool_calls.len(), 1);
        assert_eq!(back.tool_calls[0].name, "edit_scene");
    }

    #[test]
    fn reasoning_omitted_from_json_when_absent() {
        let msg = Message::assistant("plain");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("reasoning"));
    }
}
