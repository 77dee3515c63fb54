//! List files tool

use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool};

use super::{path_to_display, validate_path};

#[derive(Debug, Default, Deserialize)]
struct ListFilesInput {
    #[serde(default)]
    path: Option<String>,
}

/// Tool for recursively listing a directory
pub struct ListFiles {
    workspace: PathBuf,
}

impl ListFiles {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for ListFiles {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. If no path is provided, lists files in the \
         current directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Optional relative path to list files from. Defaults to current directory if not provided."
                }
            }
        })
    }

    fn execute(&self, input: Value) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            // Models often send null instead of {} for "no arguments"
            let input: ListFilesInput = if input.is_null() {
                ListFilesInput::default()
            } else {
                serde_json::from_value(input).map_err(ToolError::decode)?
            };

            let dir = match input.path.as_deref() {
                Some(p) if !p.is_empty() => self.workspace.join(p),
                _ => self.workspace.clone(),
            };
            let root = validate_path(&dir, &self.workspace)?;

            let mut files = Vec::new();
            for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                let relative = entry
                    .path()
                    .strip_prefix(&root)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

                let mut display = path_to_display(relative);
                if entry.file_type().is_dir() {
                    display.push('/');
                }
                files.push(display);
            }

            serde_json::to_string(&files).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
        })
    }
}
