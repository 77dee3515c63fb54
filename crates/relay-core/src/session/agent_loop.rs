//! Agent Loop - the core execution loop of a session
//!
//! The loop owns the conversation and moves through four states:
//!
//! ```text
//!  AwaitingUserInput ──line──▶ Inferring ──tool requests──▶ DispatchingTools
//!         ▲    │                   │  ▲                            │
//!         │    └─exhausted─▶ Finished │                            │
//!         └──────text only─────────┘  └────────tool results────────┘
//! ```
//!
//! A reply with tool requests is always answered by a tool-result turn and an
//! immediate new inference call, so the model sees every outcome before the
//! user is asked for anything.

use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::io::{InputSource, OutputSink};
use super::types::SessionOutput;
use crate::conversation::{Conversation, Segment, ToolOutcome, ToolRequest, Turn};
use crate::error::Result;
use crate::provider::InferenceClient;
use crate::tools::{ToolDefinition, ToolDispatcher, ToolRegistry};

/// Where the loop is between steps
#[derive(Debug, Clone, PartialEq)]
enum LoopState {
    AwaitingUserInput,
    Inferring,
    /// Requests from the last model turn, in emission order
    DispatchingTools(Vec<ToolRequest>),
    Finished,
}

/// The agent loop that drives one interactive session
pub struct AgentLoop {
    session_id: String,
    client: Arc<dyn InferenceClient>,
    dispatcher: ToolDispatcher,
    /// Cached once; the registry is read-only for the whole session
    tool_definitions: Vec<ToolDefinition>,
    input: Box<dyn InputSource>,
    output: Box<dyn OutputSink>,
    conversation: Conversation,
}

impl AgentLoop {
    /// Create a new agent loop
    pub fn new(
        client: Arc<dyn InferenceClient>,
        registry: Arc<ToolRegistry>,
        input: Box<dyn InputSource>,
        output: Box<dyn OutputSink>,
    ) -> Self {
        let tool_definitions = registry.definitions();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            client,
            dispatcher: ToolDispatcher::new(registry),
            tool_definitions,
            input,
            output,
            conversation: Conversation::default(),
        }
    }

    /// Id used to tag this session's log lines
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// History so far
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run until the input source is exhausted or inference fails
    ///
    /// Input exhaustion is a clean `Ok(())`. Inference and input I/O errors
    /// are returned as-is; tool failures never are.
    #[instrument(name = "session", skip(self), fields(id = %self.session_id))]
    pub async fn run(&mut self) -> Result<()> {
        info!(model = %self.client.model(), tools = self.tool_definitions.len(), "Agent loop starting");

        let mut state = LoopState::AwaitingUserInput;
        while state != LoopState::Finished {
            state = match state {
                LoopState::AwaitingUserInput => self.await_user_input().await?,
                LoopState::Inferring => self.infer().await?,
                LoopState::DispatchingTools(pending) => self.dispatch_tools(pending).await,
                LoopState::Finished => LoopState::Finished,
            };
        }

        info!(turns = self.conversation.len(), "Agent loop ended");
        Ok(())
    }

    async fn await_user_input(&mut self) -> Result<LoopState> {
        self.output.emit(SessionOutput::AwaitingInput);

        let Some(line) = self.input.read_line().await? else {
            debug!("Input source exhausted");
            return Ok(LoopState::Finished);
        };

        self.conversation.push(Turn::user(line));
        Ok(LoopState::Inferring)
    }

    async fn infer(&mut self) -> Result<LoopState> {
        debug!(turns = self.conversation.len(), "Calling inference");

        let reply = self
            .client
            .send(self.conversation.turns(), &self.tool_definitions)
            .await
            .map_err(|e| {
                error!(error = %e, "Inference failed");
                e
            })?;

        let mut pending = Vec::new();
        for segment in &reply.segments {
            match segment {
                Segment::Text { text } if !text.is_empty() => {
                    self.output.emit(SessionOutput::assistant_message(text.as_str()));
                }
                Segment::Text { .. } => {}
                Segment::ToolRequest(request) => pending.push(request.clone()),
            }
        }
        self.conversation.push(Turn::Model(reply));

        if pending.is_empty() {
            Ok(LoopState::AwaitingUserInput)
        } else {
            debug!(count = pending.len(), "Model requested tools");
            Ok(LoopState::DispatchingTools(pending))
        }
    }

    async fn dispatch_tools(&mut self, pending: Vec<ToolRequest>) -> LoopState {
        let mut outcomes: Vec<ToolOutcome> = Vec::with_capacity(pending.len());

        for request in &pending {
            self.output.emit(SessionOutput::tool_call(
                &request.id,
                &request.name,
                request.input.clone(),
            ));

            let outcome = self.dispatcher.dispatch_request(request).await;

            self.output.emit(SessionOutput::tool_result(
                &request.id,
                &request.name,
                !outcome.is_error,
                outcome.payload.as_str(),
            ));
            outcomes.push(outcome);
        }

        self.conversation.push(Turn::tool_results(outcomes));
        LoopState::Inferring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ModelTurn;
    use crate::error::Error;
    use crate::session::ScriptedInput;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct FailingClient;

    #[async_trait]
    impl InferenceClient for FailingClient {
        fn model(&self) -> &str {
            "failing"
        }

        async fn send(&self, _history: &[Turn], _tools: &[ToolDefinition]) -> Result<ModelTurn> {
            Err(Error::Provider("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_inference_failure_is_fatal() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut agent = AgentLoop::new(
            Arc::new(FailingClient),
            Arc::new(ToolRegistry::new()),
            Box::new(ScriptedInput::new(["hi", "never read"])),
            Box::new(tx),
        );

        let err = agent.run().await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        // The user turn was recorded before the call failed
        assert_eq!(agent.conversation().len(), 1);
    }

    struct CountingClient {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl InferenceClient for CountingClient {
        fn model(&self) -> &str {
            "counting"
        }

        async fn send(&self, _history: &[Turn], _tools: &[ToolDefinition]) -> Result<ModelTurn> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(ModelTurn::new(vec![Segment::text("?")]))
        }
    }

    #[tokio::test]
    async fn test_blank_line_is_still_a_user_turn() {
        let client = Arc::new(CountingClient {
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut agent = AgentLoop::new(
            client.clone(),
            Arc::new(ToolRegistry::new()),
            Box::new(ScriptedInput::new(["   "])),
            Box::new(tx),
        );

        agent.run().await.unwrap();

        let turns = agent.conversation().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("   "));
        assert_eq!(turns[1].role(), "model");
        assert_eq!(client.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
