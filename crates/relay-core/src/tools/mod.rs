//! Tool system for Relay
//!
//! Tools are the actions the model can take. Each tool has:
//! - A name and description for the LLM
//! - A JSON schema for its input
//! - An execute method that decodes the input itself and returns text

mod dispatcher;
pub mod filesystem;

pub use dispatcher::{TOOL_NOT_FOUND, ToolDispatcher};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Error, Result, ToolError};

/// Boxed future type for object-safe async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Tool definition for LLM consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Core trait for all tools
pub trait Tool: Send + Sync {
    /// Tool name (used by LLM to invoke)
    fn name(&self) -> &str;

    /// Description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the raw input sent by the model.
    ///
    /// Input that does not match the schema must come back as
    /// `ToolError::InvalidParams`, never as a panic.
    fn execute(&self, input: Value) -> BoxFuture<'_, std::result::Result<String, ToolError>>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Registry of available tools
///
/// Filled once at startup and only read afterwards. Listing order is
/// registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateToolName(name));
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by name
    pub fn lookup(&self, name: &str) -> std::result::Result<Arc<dyn Tool>, ToolError> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.tools[index]))
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Definitions of every tool, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Registry with the standard tools: read_file, list_files, edit_file
pub fn standard_tool_registry(workspace: &Path) -> Result<ToolRegistry> {
    use filesystem::{EditFile, ListFiles, ReadFile};

    let workspace = workspace.to_path_buf();
    ToolRegistry::new()
        .with(Arc::new(ReadFile::new(workspace.clone())))?
        .with(Arc::new(ListFiles::new(workspace.clone())))?
        .with(Arc::new(EditFile::new(workspace)))
}

/// Helper macro for creating tool parameter schemas
#[macro_export]
macro_rules! tool_params {
    ($($field:ident : $type:expr => $desc:expr),* $(,)?) => {
        serde_json::json!({
            "type": "object",
            "properties": {
                $( stringify!($field): { "type": $type, "description": $desc } ),*
            },
            "required": [ $( stringify!($field) ),* ]
        })
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo(&'static str);

    impl Tool for Echo {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn parameters_schema(&self) -> Value {
            tool_params!(text: "string" => "Text to echo")
        }

        fn execute(&self, input: Value) -> BoxFuture<'_, std::result::Result<String, ToolError>> {
            Box::pin(async move { Ok(input.to_string()) })
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("echo"))).unwrap();

        let err = registry.register(Arc::new(Echo("echo"))).unwrap_err();
        assert!(matches!(err, Error::DuplicateToolName(ref n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let registry = ToolRegistry::new()
            .with(Arc::new(Echo("b")))
            .and_then(|r| r.with(Arc::new(Echo("a"))))
            .and_then(|r| r.with(Arc::new(Echo("c"))))
            .unwrap();

        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(registry.names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ToolRegistry::new();
        assert!(matches!(registry.lookup("nope"), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_tool_params_macro() {
        let schema = tool_params!(path: "string" => "A path");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["path"]));
    }
}
