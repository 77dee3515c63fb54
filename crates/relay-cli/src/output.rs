//! Console rendering of session events

use std::io::Write;

use console::style;
use relay_core::formatting::{format_tool_call, format_tool_result_summary};
use relay_core::session::{OutputSink, SessionOutput};

/// Prints session events to stdout with colors
pub struct ConsoleOutput {
    /// Shown before assistant text, e.g. "Claude"
    assistant_label: String,
}

impl ConsoleOutput {
    pub fn new(assistant_label: impl Into<String>) -> Self {
        Self {
            assistant_label: assistant_label.into(),
        }
    }

    /// The styled text for one event. The input prompt has no trailing newline.
    fn render(&self, output: &SessionOutput) -> String {
        match output {
            SessionOutput::AwaitingInput => format!("{} ", style("You:").blue().bold()),
            SessionOutput::AssistantMessage { content } => format!(
                "{}: {}",
                style(&self.assistant_label).yellow().bold(),
                style(content).yellow()
            ),
            SessionOutput::ToolCall {
                name, arguments, ..
            } => style(format!("tool: {}", format_tool_call(name, arguments)))
                .green()
                .to_string(),
            SessionOutput::ToolResult {
                name,
                success,
                output,
                ..
            } => {
                let mark = if *success {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                let summary = format_tool_result_summary(name, *success, output);
                format!("  {} {}", mark, style(summary).dim())
            }
        }
    }
}

impl OutputSink for ConsoleOutput {
    fn emit(&self, output: SessionOutput) {
        let rendered = self.render(&output);
        let mut stdout = std::io::stdout().lock();

        let written = if matches!(output, SessionOutput::AwaitingInput) {
            write!(stdout, "{}", rendered).and_then(|_| stdout.flush())
        } else {
            writeln!(stdout, "{}", rendered)
        };

        if let Err(e) = written {
            tracing::debug!("Failed to write to stdout: {}", e);
        }
    }
}
