//! Read file tool

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool};

use super::validate_path;

#[derive(Debug, Deserialize)]
struct ReadFileInput {
    path: String,
}

/// Tool for reading file contents
pub struct ReadFile {
    workspace: PathBuf,
}

impl ReadFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see what's \
         inside a file. Do not use this with directory names."
    }

    fn parameters_schema(&self) -> Value {
        crate::tool_params!(path: "string" => "The relative path of a file in the working directory.")
    }

    fn execute(&self, input: Value) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let input: ReadFileInput = serde_json::from_value(input).map_err(ToolError::decode)?;

            let validated = validate_path(&self.workspace.join(&input.path), &self.workspace)?;

            tokio::fs::read_to_string(&validated)
                .await
                .map_err(ToolError::Io)
        })
    }
}
