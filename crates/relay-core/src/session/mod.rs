//! Session module - the interactive agent loop
//!
//! Key components:
//!
//! - `AgentLoop`: owns the conversation and drives inference and tool dispatch
//! - `InputSource`: where user lines come from (stdin, or a script in tests)
//! - `OutputSink` / `SessionOutput`: ordered, presentational events for a frontend
//!
//! # Example Usage
//!
//! ```ignore
//! use relay_core::session::{AgentLoop, LineInput, SessionOutput};
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut agent = AgentLoop::new(client, registry, Box::new(LineInput::stdin()), Box::new(tx));
//!
//! tokio::spawn(async move {
//!     while let Some(output) = rx.recv().await {
//!         if let SessionOutput::AssistantMessage { content } = output {
//!             println!("{}", content);
//!         }
//!     }
//! });
//!
//! agent.run().await?;
//! ```

mod agent_loop;
mod io;
mod types;

pub use agent_loop::AgentLoop;
pub use io::{InputSource, LineInput, OutputSink, ScriptedInput};
pub use types::SessionOutput;
