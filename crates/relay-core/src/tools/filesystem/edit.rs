//! Edit file tool - single-match replacement, or creation of a new file

use serde::Deserialize;
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool};

use super::{path_to_display, validate_path, validate_write_path};

#[derive(Debug, Deserialize)]
struct EditFileInput {
    path: String,
    old_str: String,
    new_str: String,
}

/// Tool for replacing text in a file, or creating it when absent
pub struct EditFile {
    workspace: PathBuf,
}

impl EditFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }

    async fn create_file(&self, target: &Path, display: &str, content: &str) -> Result<String, ToolError> {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ToolError::ExecutionFailed(format!("failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(target, content)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("failed to create file: {}", e)))?;

        Ok(format!("successfully created file {}", display))
    }
}

/// Occurrences of `needle` in `haystack`, overlapping ones included.
///
/// `str::matches` skips overlaps, so "aa" in "aaa" would look unique there.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        count += 1;
        let step = rest[pos..].chars().next().map_or(1, char::len_utf8);
        rest = &rest[pos + step..];
    }
    count
}

impl Tool for EditFile {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Make edits to a text file.\n\
         Replaces 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be \
         different from each other, and 'old_str' must match exactly one place in the file.\n\
         If the file specified with path doesn't exist and 'old_str' is empty, it will be created \
         with 'new_str' as its content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file"
                },
                "old_str": {
                    "type": "string",
                    "description": "Text to search for - must match exactly and must only have one match exactly"
                },
                "new_str": {
                    "type": "string",
                    "description": "Text to replace old_str with"
                }
            },
            "required": ["path", "old_str", "new_str"]
        })
    }

    fn execute(&self, input: Value) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let input: EditFileInput = serde_json::from_value(input).map_err(ToolError::decode)?;

            if input.path.is_empty() || input.old_str == input.new_str {
                return Err(ToolError::InvalidParams("invalid input parameters".into()));
            }

            let target = validate_write_path(Path::new(&input.path), &self.workspace)?;

            let content = match tokio::fs::read_to_string(&target).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    if input.old_str.is_empty() {
                        return self.create_file(&target, &input.path, &input.new_str).await;
                    }
                    return Err(ToolError::ResourceNotFound(format!(
                        "File not found: {}",
                        input.path
                    )));
                }
                Err(e) => return Err(ToolError::Io(e)),
            };

            // The file exists, so symlinks can be resolved now
            let target = validate_path(&target, &self.workspace)?;

            if input.old_str.is_empty() {
                return Err(ToolError::InvalidParams(
                    "old_str must not be empty when editing an existing file".into(),
                ));
            }

            match count_occurrences(&content, &input.old_str) {
                0 => Err(ToolError::InvalidParams("old_str not found in file".into())),
                1 => {
                    let new_content = content.replacen(&input.old_str, &input.new_str, 1);
                    tokio::fs::write(&target, new_content)
                        .await
                        .map_err(ToolError::Io)?;
                    tracing::debug!(path = %path_to_display(&target), "Edited file");
                    Ok("OK".to_string())
                }
                n => Err(ToolError::InvalidParams(format!(
                    "old_str appears {} times in the file; include more surrounding context so it matches exactly once",
                    n
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_occurrences_includes_overlaps() {
        assert_eq!(count_occurrences("aaa", "aa"), 2);
        assert_eq!(count_occurrences("foo bar foo", "foo"), 2);
        assert_eq!(count_occurrences("héhéhé", "héhé"), 2);
        assert_eq!(count_occurrences("abc", "d"), 0);
        assert_eq!(count_occurrences("abc", ""), 0);
    }
}
