//! Formatting utilities for tool display
//!
//! Short, single-line renderings of tool calls and their results for the
//! chat transcript. The model always receives the full payload; these are
//! only for people.

use serde_json::Value;

/// Longest argument rendering shown in a tool-call line
const MAX_ARGS_DISPLAY: usize = 100;
/// Longest result preview shown in a summary line
const MAX_PREVIEW: usize = 60;

/// Truncate a string to max bytes (on a char boundary), adding "..." if truncated
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Format a tool call as `name(input)`, with the input as compact JSON
pub fn format_tool_call(tool_name: &str, args: &Value) -> String {
    let rendered = match args {
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    };
    format!("{}({})", tool_name, truncate_str(&rendered, MAX_ARGS_DISPLAY))
}

/// Format a tool result summary: short, one-line description of what happened
pub fn format_tool_result_summary(tool_name: &str, success: bool, output: &str) -> String {
    if !success {
        let err_preview = output.lines().next().unwrap_or("Error");
        return format!("Error: {}", truncate_str(err_preview, MAX_PREVIEW));
    }

    match tool_name {
        "read_file" => format!("Read {} lines", output.lines().count()),
        "list_files" => match serde_json::from_str::<Vec<String>>(output) {
            Ok(entries) if entries.len() == 1 => "Listed 1 entry".to_string(),
            Ok(entries) => format!("Listed {} entries", entries.len()),
            Err(_) => truncate_str(output, MAX_PREVIEW),
        },
        _ => {
            let preview = output.lines().next().unwrap_or("");
            if preview.is_empty() {
                "Done".to_string()
            } else {
                truncate_str(preview, MAX_PREVIEW)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_str_respects_char_boundaries() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("abcdefghij", 8), "abcde...");
        // 'é' is two bytes; cutting inside it must back off
        assert_eq!(truncate_str("ééééé", 6), "é...");
    }

    #[test]
    fn test_format_tool_call() {
        assert_eq!(
            format_tool_call("read_file", &json!({"path": "main.go"})),
            r#"read_file({"path":"main.go"})"#
        );
        assert_eq!(format_tool_call("list_files", &json!({})), "list_files({})");
        assert_eq!(format_tool_call("list_files", &Value::Null), "list_files()");
    }

    #[test]
    fn test_result_summaries() {
        assert_eq!(format_tool_result_summary("read_file", true, "a\nb\nc"), "Read 3 lines");
        assert_eq!(
            format_tool_result_summary("list_files", true, r#"["a.txt","src/"]"#),
            "Listed 2 entries"
        );
        assert_eq!(format_tool_result_summary("edit_file", true, "OK"), "OK");
        assert_eq!(format_tool_result_summary("edit_file", true, ""), "Done");
        assert_eq!(
            format_tool_result_summary("delete_file", false, "tool not found"),
            "Error: tool not found"
        );
    }
}
