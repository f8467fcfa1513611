#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use memorunia::calendar::{CalendarError, CalendarProvider, CreatedEvent};
use memorunia::genai::wire::Content;
use memorunia::genai::{ChatProvider, ChatRequest, ChatResponse, EmbeddingProvider, GenAiError};
use memorunia::notes::types::Note;
use memorunia::notes::workspace::Workspace;
use memorunia::store::MemoryKvStore;

/// Fresh in-memory workspace.
pub fn test_workspace() -> Workspace {
    Workspace::load(Box::new(MemoryKvStore::new())).unwrap()
}

/// Deterministic 8-dim embedding with a spike at position `seed`.
/// Distinct seeds give orthogonal vectors.
pub fn test_embedding(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    v[seed % 8] = 1.0;
    v
}

/// Build a note with a spike embedding.
pub fn embedded_note(title: &str, content: &str, seed: usize) -> Note {
    let mut note = Note::new(title, content);
    note.embedding = Some(test_embedding(seed));
    note
}

/// Scripted embedding provider: exact texts map to fixed vectors, anything
/// else gets the default spike.
pub struct FakeEmbedding {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    default_seed: usize,
}

impl FakeEmbedding {
    pub fn new(default_seed: usize) -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            default_seed,
        }
    }

    pub fn map(self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.lock().unwrap().insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GenAiError> {
        Ok(self
            .vectors
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| test_embedding(self.default_seed)))
    }
}

/// Embedding provider that always fails, for the degrade-to-empty paths.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, GenAiError> {
        Err(GenAiError::Malformed("scripted failure".into()))
    }
}

/// Scripted chat provider.
///
/// `generate` pops from a queue of canned responses and errors once the
/// script runs out; `generate_text` and `generate_json` return fixed replies
/// (or an error when unset).
#[derive(Default)]
pub struct FakeChat {
    turns: Mutex<VecDeque<ChatResponse>>,
    text_reply: Option<String>,
    json_reply: Option<String>,
    pub requests_seen: Mutex<Vec<usize>>,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turn(self, response: ChatResponse) -> Self {
        self.turns.lock().unwrap().push_back(response);
        self
    }

    pub fn with_text_reply(mut self, reply: &str) -> Self {
        self.text_reply = Some(reply.to_string());
        self
    }

    pub fn with_json_reply(mut self, reply: &str) -> Self {
        self.json_reply = Some(reply.to_string());
        self
    }

    pub fn remaining_turns(&self) -> usize {
        self.turns.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, GenAiError> {
        self.requests_seen
            .lock()
            .unwrap()
            .push(request.contents.len());
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenAiError::Malformed("script exhausted".into()))
    }

    async fn generate_text(&self, _prompt: &str) -> Result<String, GenAiError> {
        self.text_reply
            .clone()
            .ok_or_else(|| GenAiError::Malformed("no scripted text reply".into()))
    }

    async fn generate_json(
        &self,
        _contents: Vec<Content>,
        _schema: Value,
    ) -> Result<String, GenAiError> {
        self.json_reply
            .clone()
            .ok_or_else(|| GenAiError::Malformed("no scripted json reply".into()))
    }
}

/// Build a text-only model response.
pub fn text_turn(text: &str) -> ChatResponse {
    ChatResponse {
        text: Some(text.to_string()),
        function_calls: Vec::new(),
    }
}

/// Build a tool-call model response.
pub fn tool_turn(name: &str, args: Value) -> ChatResponse {
    ChatResponse {
        text: None,
        function_calls: vec![memorunia::genai::wire::FunctionCall {
            name: name.to_string(),
            args,
        }],
    }
}

/// Calendar that records every quickAdd text.
#[derive(Default)]
pub struct FakeCalendar {
    pub added: Mutex<Vec<String>>,
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn quick_add(&self, text: &str) -> Result<CreatedEvent, CalendarError> {
        self.added.lock().unwrap().push(text.to_string());
        Ok(CreatedEvent {
            event_id: "evt-1".to_string(),
            summary: Some(text.to_string()),
        })
    }
}
