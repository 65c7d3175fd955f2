//! Progress events emitted by the agent loop.
//!
//! Events flow over an mpsc channel from the loop's background task to the
//! consumer (the gateway streams them as NDJSON lines). Every run ends with
//! exactly one terminal event: `done` on success, `error` on failure. The
//! channel closing is the close signal; nothing follows the terminal event.

use crate::plan::Plan;
use serde::{Deserialize, Serialize};
use slugline_diff::DiffResult;

/// Which half of the run an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Plan,
    Execute,
}

/// Progress state of one plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    InProgress,
    Completed,
}

/// Why a run reached its `done` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The model finished with a turn containing no tool calls
    Completed,
    /// The execution loop hit its iteration cap
    IterationLimit,
}

/// A single progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Announces a phase start and which model is handling it
    Metadata {
        phase: Phase,
        provider: String,
        model: String,
    },
    /// The parsed (or fallback) plan
    Plan { plan: Plan },
    /// A plan step changed state
    Step {
        index: usize,
        status: StepStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Incremental assistant text
    Text { content: String },
    /// The model requested a tool
    ToolCall {
        name: String,
        input: serde_json::Value,
    },
    /// A tool finished
    ToolResult {
        name: String,
        result: String,
        /// Structured diff of the document change, absent when the tool
        /// was read-only or the change was empty
        #[serde(default, skip_serializing_if = "Option::is_none")]
        patch: Option<DiffResult>,
        #[serde(
            default,
            rename = "updatedDocument",
            skip_serializing_if = "Option::is_none"
        )]
        updated_document: Option<String>,
    },
    /// Terminal: the run finished
    Done { outcome: RunOutcome },
    /// Terminal: the run failed
    Error { error: String },
}

impl StreamEvent {
    /// Whether this event ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }

    /// Serialize as one NDJSON line, newline included.
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
