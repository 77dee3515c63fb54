//! GenAI-based inference client
//!
//! Maps the conversation onto genai chat messages, streams the reply, and
//! rebuilds it as ordered segments so text that comes before a tool call is
//! still shown before it.

use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{
    ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent, Tool, ToolCall, ToolResponse,
};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, WebConfig};
use std::time::Duration;
use tracing::{debug, error};

use super::logging::{Interaction, log_llm_interaction};
use super::{InferenceClient, ProviderType};
use crate::conversation::{ModelTurn, Segment, ToolRequest, Turn};
use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

/// Default cap on tokens generated per reply
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// A provider implementation using genai
pub struct GenAIProvider {
    client: Client,
    provider_type: ProviderType,
    model: String,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl GenAIProvider {
    /// Default timeout for LLM API requests (5 minutes)
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create WebConfig with appropriate timeouts for LLM requests
    fn default_web_config() -> WebConfig {
        WebConfig::default()
            .with_timeout(Self::DEFAULT_TIMEOUT)
            .with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a new provider with default settings (uses environment variables for auth)
    pub fn new(provider_type: ProviderType, model: Option<&str>) -> Self {
        let client = Client::builder()
            .with_web_config(Self::default_web_config())
            .build();
        Self {
            client,
            provider_type,
            model: model.unwrap_or(provider_type.default_model()).to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
        }
    }

    /// Create a provider with a specific API key
    pub fn with_api_key(provider_type: ProviderType, api_key: &str, model: Option<&str>) -> Self {
        let api_key = api_key.to_string();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden| -> std::result::Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = Client::builder()
            .with_web_config(Self::default_web_config())
            .with_auth_resolver(auth_resolver)
            .build();

        Self {
            client,
            provider_type,
            model: model.unwrap_or(provider_type.default_model()).to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the reply token cap
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        self.provider_type
    }

    /// Build the genai request for the whole history
    fn build_request(&self, history: &[Turn], tools: &[ToolDefinition]) -> ChatRequest {
        let mut chat_req = ChatRequest::default();

        if let Some(system) = &self.system_prompt {
            chat_req = chat_req.with_system(system.as_str());
        }

        for turn in history {
            chat_req = append_turn(chat_req, turn);
        }

        if !tools.is_empty() {
            let genai_tools: Vec<Tool> = tools
                .iter()
                .map(|t| {
                    Tool::new(&t.name)
                        .with_description(&t.description)
                        .with_schema(t.parameters.clone())
                })
                .collect();
            chat_req = chat_req.with_tools(genai_tools);
        }

        chat_req
    }

    async fn stream_reply(&self, chat_req: ChatRequest) -> Result<ModelTurn> {
        let options = ChatOptions::default().with_max_tokens(self.max_tokens);

        let stream_response = self
            .client
            .exec_chat_stream(&self.model, chat_req, Some(&options))
            .await
            .map_err(|e| {
                error!(error = ?e, model = %self.model, "LLM request failed");
                Error::Provider(format!("GenAI error: {:?}", e))
            })?;

        let mut collector = SegmentCollector::default();
        let mut stream = stream_response.stream;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) => collector.push_text(&chunk.content),
                Ok(ChatStreamEvent::ToolCallChunk(tc)) => collector.push_tool_call(tc.tool_call),
                Ok(ChatStreamEvent::End(_)) => break,
                // Start, reasoning and thought-signature events don't become segments
                Ok(_) => {}
                Err(e) => {
                    error!(error = ?e, model = %self.model, "LLM stream error");
                    return Err(Error::Provider(format!("GenAI stream error: {:?}", e)));
                }
            }
        }

        Ok(collector.finish())
    }
}

/// Append one conversation turn to a genai request
fn append_turn(chat_req: ChatRequest, turn: &Turn) -> ChatRequest {
    match turn {
        Turn::User { text } => chat_req.append_message(ChatMessage::user(text.as_str())),
        Turn::Model(model_turn) => {
            let tool_calls: Vec<ToolCall> = model_turn
                .tool_requests()
                .map(|r| ToolCall {
                    call_id: r.id.clone(),
                    fn_name: r.name.clone(),
                    fn_arguments: r.input.clone(),
                    thought_signatures: None,
                })
                .collect();

            // OpenAI-style APIs need every tool call of a turn in one
            // assistant message, so the text is not sent separately
            if !tool_calls.is_empty() {
                return chat_req.append_message(tool_calls);
            }

            let text = model_turn.joined_text();
            if text.is_empty() {
                chat_req
            } else {
                chat_req.append_message(ChatMessage::assistant(text))
            }
        }
        Turn::ToolResults { outcomes } => outcomes.iter().fold(chat_req, |req, outcome| {
            // genai's ToolResponse has no error flag, so mark it in the content
            let content = if outcome.is_error {
                format!("Error: {}", outcome.payload)
            } else {
                outcome.payload.clone()
            };
            req.append_message(ToolResponse::new(outcome.id.clone(), content))
        }),
    }
}

/// Rebuilds ordered segments from stream events
#[derive(Debug, Default)]
struct SegmentCollector {
    segments: Vec<Segment>,
}

impl SegmentCollector {
    fn push_text(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        if let Some(Segment::Text { text }) = self.segments.last_mut() {
            text.push_str(chunk);
        } else {
            self.segments.push(Segment::text(chunk));
        }
    }

    fn push_tool_call(&mut self, call: ToolCall) {
        let request = ToolRequest::new(call.call_id, call.fn_name, call.fn_arguments);

        // Some adapters re-send a call as its arguments fill in
        if let Some(Segment::ToolRequest(last)) = self.segments.last_mut()
            && last.id == request.id
        {
            *last = request;
            return;
        }
        self.segments.push(Segment::ToolRequest(request));
    }

    fn finish(self) -> ModelTurn {
        ModelTurn::new(self.segments)
    }
}

#[async_trait]
impl InferenceClient for GenAIProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, history: &[Turn], tools: &[ToolDefinition]) -> Result<ModelTurn> {
        debug!(
            model = %self.model,
            turns = history.len(),
            tools = tools.len(),
            "Sending inference request"
        );

        let chat_req = self.build_request(history, tools);
        let result = self.stream_reply(chat_req).await;

        let error_text = result.as_ref().err().map(|e| e.to_string());
        log_llm_interaction(Interaction {
            model: &self.model,
            history,
            tools,
            reply: result.as_ref().ok(),
            error: error_text.as_deref(),
        });

        result
    }
}

/// Create a provider from configuration
pub fn create_provider(
    provider_type: ProviderType,
    api_key: Option<&str>,
    model: Option<&str>,
    max_tokens: u32,
    system_prompt: Option<&str>,
) -> GenAIProvider {
    let provider = match api_key {
        Some(key) => GenAIProvider::with_api_key(provider_type, key, model),
        None => GenAIProvider::new(provider_type, model),
    };

    let provider = provider.with_max_tokens(max_tokens);

    match system_prompt {
        Some(prompt) => provider.with_system_prompt(prompt),
        None => provider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ToolOutcome;
    use genai::chat::ChatRole;
    use serde_json::json;

    fn tool_call(id: &str, name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            call_id: id.to_string(),
            fn_name: name.to_string(),
            fn_arguments: args,
            thought_signatures: None,
        }
    }

    #[test]
    fn test_collector_keeps_stream_order() {
        let mut collector = SegmentCollector::default();
        collector.push_text("Here is ");
        collector.push_text("the result:");
        collector.push_tool_call(tool_call("t1", "list_files", json!({})));
        collector.push_text("");
        collector.push_text("Done.");

        let turn = collector.finish();
        assert_eq!(
            turn.segments,
            vec![
                Segment::text("Here is the result:"),
                Segment::tool_request("t1", "list_files", json!({})),
                Segment::text("Done."),
            ]
        );
    }

    #[test]
    fn test_collector_replaces_repeated_call() {
        let mut collector = SegmentCollector::default();
        collector.push_tool_call(tool_call("t1", "read_file", json!({})));
        collector.push_tool_call(tool_call("t1", "read_file", json!({"path": "a.txt"})));
        collector.push_tool_call(tool_call("t2", "read_file", json!({"path": "b.txt"})));

        let turn = collector.finish();
        assert_eq!(turn.segments.len(), 2);
        assert_eq!(
            turn.segments[0],
            Segment::tool_request("t1", "read_file", json!({"path": "a.txt"}))
        );
    }

    #[test]
    fn test_build_request_maps_every_turn() {
        let provider = GenAIProvider::with_api_key(ProviderType::Anthropic, "test-key", None)
            .with_system_prompt("be brief");
        let history = vec![
            Turn::user("list files"),
            Turn::Model(ModelTurn::new(vec![
                Segment::text("Sure."),
                Segment::tool_request("t1", "list_files", json!({})),
                Segment::tool_request("t2", "read_file", json!({"path": "a"})),
            ])),
            Turn::tool_results(vec![
                ToolOutcome::success("t1", "[\"a\"]"),
                ToolOutcome::error("t2", "boom"),
            ]),
        ];
        let tools = vec![ToolDefinition {
            name: "list_files".into(),
            description: "list".into(),
            parameters: json!({"type": "object"}),
        }];

        let req = provider.build_request(&history, &tools);

        let roles: Vec<_> = req.messages.iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::Tool,
                ChatRole::Tool,
            ]
        );
        assert_eq!(req.system.as_deref(), Some("be brief"));
        assert_eq!(req.tools.map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_build_request_text_only_model_turn() {
        let provider = GenAIProvider::with_api_key(ProviderType::Anthropic, "test-key", None);
        let history = vec![
            Turn::user("hi"),
            Turn::Model(ModelTurn::new(vec![Segment::text("Hello"), Segment::text("!")])),
            Turn::Model(ModelTurn::new(vec![Segment::text("")])),
        ];

        let req = provider.build_request(&history, &[]);

        let roles: Vec<_> = req.messages.iter().map(|m| m.role.clone()).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[test]
    fn test_default_model_and_tokens() {
        let provider = create_provider(ProviderType::Anthropic, Some("k"), None, DEFAULT_MAX_TOKENS, None);
        assert_eq!(provider.model(), "claude-3-5-haiku-latest");
        assert_eq!(provider.provider_type(), ProviderType::Anthropic);
        assert_eq!(provider.max_tokens, 1024);
    }
}
