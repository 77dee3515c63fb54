//! LLM Provider abstraction
//!
//! The agent loop talks to the model through [`InferenceClient`]. The shipped
//! implementation is [`GenAIProvider`], built on the genai framework, which
//! covers these providers:
//! - Anthropic (Claude)
//! - OpenAI (GPT-4o, etc.)
//! - Google Gemini
//! - Groq
//! - DeepSeek
//! - xAI
//! - Ollama (local)

mod genai_provider;
pub mod logging;

pub use genai_provider::{DEFAULT_MAX_TOKENS, GenAIProvider, create_provider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::{ModelTurn, Turn};
use crate::error::Result;
use crate::tools::ToolDefinition;

/// Sends the whole conversation to a model and returns its reply.
///
/// Implementations own transport concerns (auth, timeouts, retries). Any
/// error returned here ends the session.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Model identifier, for display
    fn model(&self) -> &str;

    /// Run one inference call over the full history
    async fn send(&self, history: &[Turn], tools: &[ToolDefinition]) -> Result<ModelTurn>;
}

/// Supported LLM provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Anthropic,
    OpenAI,
    Gemini,
    Groq,
    DeepSeek,
    XAI,
    Ollama,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderType::Anthropic),
            "openai" => Ok(ProviderType::OpenAI),
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "groq" => Ok(ProviderType::Groq),
            "deepseek" => Ok(ProviderType::DeepSeek),
            "xai" | "grok" => Ok(ProviderType::XAI),
            "ollama" => Ok(ProviderType::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl ProviderType {
    /// All provider types, in display order
    pub const ALL: [ProviderType; 7] = [
        ProviderType::Anthropic,
        ProviderType::OpenAI,
        ProviderType::Gemini,
        ProviderType::Groq,
        ProviderType::DeepSeek,
        ProviderType::XAI,
        ProviderType::Ollama,
    ];

    /// Get the provider type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Anthropic => "anthropic",
            ProviderType::OpenAI => "openai",
            ProviderType::Gemini => "gemini",
            ProviderType::Groq => "groq",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::XAI => "xai",
            ProviderType::Ollama => "ollama",
        }
    }

    /// Get the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderType::Anthropic => "claude-3-5-haiku-latest",
            ProviderType::OpenAI => "gpt-4o-mini",
            ProviderType::Gemini => "gemini-2.0-flash",
            ProviderType::Groq => "llama-3.3-70b-versatile",
            ProviderType::DeepSeek => "deepseek-chat",
            ProviderType::XAI => "grok-3-mini",
            ProviderType::Ollama => "llama3.2",
        }
    }

    /// Environment variable holding the API key (Ollama needs none)
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Gemini => Some("GEMINI_API_KEY"),
            ProviderType::Groq => Some("GROQ_API_KEY"),
            ProviderType::DeepSeek => Some("DEEPSEEK_API_KEY"),
            ProviderType::XAI => Some("XAI_API_KEY"),
            ProviderType::Ollama => None,
        }
    }

    /// Human-friendly label for the assistant in the chat transcript
    pub fn assistant_label(&self) -> &'static str {
        match self {
            ProviderType::Anthropic => "Claude",
            ProviderType::OpenAI => "GPT",
            ProviderType::Gemini => "Gemini",
            ProviderType::Groq => "Groq",
            ProviderType::DeepSeek => "DeepSeek",
            ProviderType::XAI => "Grok",
            ProviderType::Ollama => "Ollama",
        }
    }
}
