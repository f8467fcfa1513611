//! Hosted generative API clients.
//!
//! Provides the [`EmbeddingProvider`] and [`ChatProvider`] traits and the
//! hosted implementation in [`gemini`]. Both traits are seams: tests script
//! them, the binary wires in [`gemini::GeminiClient`] from configuration.

pub mod gemini;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use wire::{Content, FunctionCall, FunctionDeclaration};

/// One chat-provider call: accumulated conversation, declared tools, and the
/// fixed system instruction.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<FunctionDeclaration>,
    pub system_instruction: Option<String>,
}

/// What a chat-provider call produced: plain text, tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub text: Option<String>,
    pub function_calls: Vec<FunctionCall>,
}

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Trait for embedding text into vectors via a hosted endpoint.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GenAiError>;
}

/// Trait for the hosted chat/generation endpoint.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Full conversation turn: history, tool declarations, system instruction.
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, GenAiError>;

    /// Single-prompt text generation (summaries, rewrites, RAG answers).
    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError>;

    /// Structured JSON generation constrained by a response schema (clustering).
    async fn generate_json(
        &self,
        contents: Vec<wire::Content>,
        schema: serde_json::Value,
    ) -> Result<String, GenAiError>;
}

/// Trait for the hosted text-to-speech endpoint.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize `text` into raw PCM samples (24 kHz, mono, 16-bit LE).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, GenAiError>;
}

/// Embed `text`, degrading to an empty vector on any failure.
///
/// This is the only embedding entry point used on the note/query path: an
/// embedding-service outage must never fail a note mutation, it just leaves
/// the note unrankable (every similarity against it scores 0).
pub async fn embed_or_empty(provider: &dyn EmbeddingProvider, text: &str) -> Vec<f32> {
    match provider.embed(text).await {
        Ok(vector) => vector,
        Err(err) => {
            warn!(%err, "embedding failed, storing empty vector");
            Vec::new()
        }
    }
}
