//! Conversation history
//!
//! A conversation is an append-only list of turns. User turns hold the text
//! typed by the operator, model turns hold the segments returned by inference,
//! and tool-result turns hold one outcome per tool request of the model turn
//! right before them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Correlation id assigned by the inference side
    pub id: String,
    pub name: String,
    /// Raw input, decoded by the tool itself
    pub input: Value,
}

impl ToolRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// One piece of a model turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    ToolRequest(ToolRequest),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_request(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolRequest(ToolRequest::new(id, name, input))
    }
}

/// Everything the model returned for one inference call, in emission order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTurn {
    pub segments: Vec<Segment>,
}

impl ModelTurn {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Tool requests in the order the model emitted them
    pub fn tool_requests(&self) -> impl Iterator<Item = &ToolRequest> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::ToolRequest(request) => Some(request),
            Segment::Text { .. } => None,
        })
    }

    pub fn has_tool_requests(&self) -> bool {
        self.tool_requests().next().is_some()
    }

    /// All text segments joined, for logging
    pub fn joined_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text { text } => Some(text.as_str()),
                Segment::ToolRequest(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Result of executing one requested tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Copied from the requesting [`ToolRequest`]
    pub id: String,
    pub payload: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
            is_error: false,
        }
    }

    pub fn error(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
            is_error: true,
        }
    }
}

/// One unit of conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User { text: String },
    Model(ModelTurn),
    #[serde(rename = "tool_result")]
    ToolResults { outcomes: Vec<ToolOutcome> },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn tool_results(outcomes: Vec<ToolOutcome>) -> Self {
        Self::ToolResults { outcomes }
    }

    /// Role name used in logs and request dumps
    pub fn role(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Model(_) => "model",
            Self::ToolResults { .. } => "tool_result",
        }
    }
}

/// Append-only conversation history
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
