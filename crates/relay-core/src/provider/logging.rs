//! LLM request/response logging
//!
//! Set the `LLM_LOG_FILE` environment variable to append one JSON line per
//! inference call (full history, tool list, and the parsed reply or error).
//!
//! Example: `LLM_LOG_FILE=/tmp/llm.log relay`

use serde_json::json;
use std::io::Write;
use tracing::{debug, warn};

use crate::conversation::{ModelTurn, Turn};
use crate::tools::ToolDefinition;

/// Environment variable naming the log file
pub const LLM_LOG_FILE_ENV: &str = "LLM_LOG_FILE";

/// What goes into one log entry
pub struct Interaction<'a> {
    pub model: &'a str,
    pub history: &'a [Turn],
    pub tools: &'a [ToolDefinition],
    pub reply: Option<&'a ModelTurn>,
    pub error: Option<&'a str>,
}

impl Interaction<'_> {
    fn to_json(&self) -> serde_json::Value {
        json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "model": self.model,
            "request": {
                "history": self.history,
                "turn_count": self.history.len(),
                "tools": self.tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
            },
            "response": self.reply,
            "error": self.error,
        })
    }
}

/// Append the interaction to `$LLM_LOG_FILE`, if set
pub fn log_llm_interaction(interaction: Interaction<'_>) {
    let Ok(log_file) = std::env::var(LLM_LOG_FILE_ENV) else {
        return;
    };

    let line = match serde_json::to_string(&interaction.to_json()) {
        Ok(line) => line,
        Err(e) => {
            warn!("Failed to serialize LLM log entry: {}", e);
            return;
        }
    };

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", line) {
                warn!("Failed to write to LLM log file: {}", e);
            }
        }
        Err(e) => warn!("Failed to open LLM log file {}: {}", log_file, e),
    }

    debug!("Logged LLM interaction to {}", log_file);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Segment;

    #[test]
    fn test_entry_shape() {
        let history = vec![Turn::user("hi")];
        let reply = ModelTurn::new(vec![Segment::text("hello")]);
        let entry = Interaction {
            model: "m",
            history: &history,
            tools: &[],
            reply: Some(&reply),
            error: None,
        }
        .to_json();

        assert_eq!(entry["model"], "m");
        assert_eq!(entry["request"]["turn_count"], 1);
        assert_eq!(entry["request"]["history"][0]["role"], "user");
        assert_eq!(entry["response"]["segments"][0]["text"], "hello");
        assert!(entry["error"].is_null());
    }
}
