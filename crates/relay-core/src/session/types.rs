//! Session output protocol
//!
//! These events flow from the agent loop to whatever frontend renders the
//! chat. They are presentational only; the conversation itself lives in the
//! loop.

use serde::{Deserialize, Serialize};

/// Output messages sent FROM an agent session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionOutput {
    /// Session is about to read a line of user input
    AwaitingInput,
    /// A text segment from the model
    AssistantMessage { content: String },
    /// A tool is about to be executed
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },
    /// Tool execution completed
    ToolResult {
        id: String,
        name: String,
        success: bool,
        output: String,
    },
}

impl SessionOutput {
    /// Create an assistant message output
    pub fn assistant_message(content: impl Into<String>) -> Self {
        Self::AssistantMessage {
            content: content.into(),
        }
    }

    /// Create a tool call output
    pub fn tool_call(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self::ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Create a tool result output
    pub fn tool_result(
        id: impl Into<String>,
        name: impl Into<String>,
        success: bool,
        output: impl Into<String>,
    ) -> Self {
        Self::ToolResult {
            id: id.into(),
            name: name.into(),
            success,
            output: output.into(),
        }
    }
}
