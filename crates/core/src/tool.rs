//! Tool trait and registry — the document-editing dispatcher.
//!
//! Tools are how the agent mutates the screenplay: read a scene, rewrite a
//! region, insert a new scene. A tool receives the current document snapshot
//! and returns its result text plus, if it changed anything, a *new*
//! snapshot. The snapshot is never edited in place — that is what makes the
//! diff engine's before/after comparison meaningful.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the provider's tool_call id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub input: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// The output text fed back to the model
    pub result: String,

    /// The new document snapshot. Absent means the tool did not change
    /// the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_document: Option<String>,
}

impl ToolOutcome {
    /// A read-only outcome: result text, document untouched.
    pub fn read_only(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            updated_document: None,
        }
    }

    /// An outcome that replaced the document snapshot.
    pub fn updated(result: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            updated_document: Some(document.into()),
        }
    }
}

/// The core Tool trait.
///
/// Each screenplay tool (read_scene, edit_scene, insert_scene, ...)
/// implements this trait. Tools are registered in the ToolRegistry and made
/// available to the agent loop as a manifest.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "edit_scene").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool against the current document snapshot.
    async fn execute(
        &self,
        input: serde_json::Value,
        document: &str,
    ) -> std::result::Result<ToolOutcome, ToolError>;

    /// Convert this tool into a ToolDefinition for the provider manifest.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Get the tool manifest to attach to completion calls
/// 2. Dispatch tool calls, in provider order, against the current snapshot
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (the manifest sent to the provider).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Dispatch a single tool call against the current document snapshot.
    pub async fn dispatch(
        &self,
        call: &ToolCall,
        document: &str,
    ) -> std::result::Result<ToolOutcome, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        tool.execute(call.input.clone(), document).await
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
