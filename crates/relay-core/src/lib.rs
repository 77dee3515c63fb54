//! Relay Core - a terminal agent loop over an LLM and local file tools
//!
//! This crate provides:
//! - The conversation model (turns, segments, tool outcomes)
//! - Tool system with read, list and edit tools confined to a workspace
//! - Inference through the genai framework
//! - The agent loop state machine and its input/output seams
//! - Configuration loading

pub mod config;
pub mod conversation;
pub mod error;
pub mod formatting;
pub mod provider;
pub mod session;
pub mod tools;

pub use config::{Config, ConfigManager, GeneralConfig, ProviderConfig};
pub use conversation::{Conversation, ModelTurn, Segment, ToolOutcome, ToolRequest, Turn};
pub use error::{Error, Result, ToolError};
pub use provider::{GenAIProvider, InferenceClient, ProviderType, create_provider};
pub use session::{AgentLoop, InputSource, LineInput, OutputSink, ScriptedInput, SessionOutput};
pub use tools::{
    TOOL_NOT_FOUND, Tool, ToolDefinition, ToolDispatcher, ToolRegistry, standard_tool_registry,
};

pub use formatting::{format_tool_call, format_tool_result_summary, truncate_str};
