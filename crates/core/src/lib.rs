//! # Slugline Core
//!
//! Domain types, traits, and error definitions for the Slugline screenplay
//! agent runtime. This crate defines the domain model that all other crates
//! implement against; nothing here talks HTTP or reads config.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of the agent loop — the completion provider
//! and the document-tool dispatcher — are defined as traits here.
//! Implementations live in their respective crates, which keeps the
//! dependency graph pointing inward and makes the loop testable with scripted
//! mocks.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, StreamChunk, ToolDefinition, Usage,
};
pub use tool::{Tool, ToolCall, ToolOutcome, ToolRegistry};
