//! Tool dispatch: name lookup, invocation, outcome normalization

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::ToolRegistry;
use crate::conversation::{ToolOutcome, ToolRequest};

/// Payload returned to the model when it asks for a tool that isn't registered
pub const TOOL_NOT_FOUND: &str = "tool not found";

/// Turns tool requests into outcomes. Never fails: unknown tools and tool
/// errors both become error outcomes.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool invocation
    pub async fn dispatch(&self, id: &str, name: &str, input: &Value) -> ToolOutcome {
        let tool = match self.registry.lookup(name) {
            Ok(tool) => tool,
            Err(_) => {
                warn!(tool_name = %name, tool_id = %id, "Model requested unknown tool");
                return ToolOutcome::error(id, TOOL_NOT_FOUND);
            }
        };

        info!(tool_name = %name, tool_id = %id, input = %input, "Invoking tool");

        match tool.execute(input.clone()).await {
            Ok(payload) => {
                debug!(tool_name = %name, bytes = payload.len(), "Tool succeeded");
                ToolOutcome::success(id, payload)
            }
            Err(e) => {
                debug!(tool_name = %name, error = %e, "Tool failed");
                ToolOutcome::error(id, e.to_string())
            }
        }
    }

    /// Convenience wrapper for a request segment
    pub async fn dispatch_request(&self, request: &ToolRequest) -> ToolOutcome {
        self.dispatch(&request.id, &request.name, &request.input).await
    }
}
