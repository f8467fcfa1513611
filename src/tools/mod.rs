//! The agent's tool surface.
//!
//! [`ToolExecutor`] maps a tool name plus JSON argument object onto a note
//! mutation or query and returns a plain JSON result. Errors are always
//! returned as data (`{"error": "..."}`) for the model to read — tool
//! execution never surfaces a fault to the agent loop.
//!
//! Each tool lives in its own module with its schemars-derived parameter
//! struct; [`declarations`] assembles the function declarations sent to the
//! model on every turn.

pub mod cluster_notes;
pub mod create_calendar_event;
pub mod create_note;
pub mod delete_note;
pub mod open_note;
pub mod rag_answer;
pub mod rewrite_note;
pub mod search_notes;
pub mod summarize_note;
pub mod update_note;

use schemars::JsonSchema;
use serde_json::{json, Value};

use crate::calendar::CalendarProvider;
use crate::config::RetrievalConfig;
use crate::genai::wire::FunctionDeclaration;
use crate::genai::{embed_or_empty, ChatProvider, EmbeddingProvider};
use crate::notes::types::embedding_text;
use crate::notes::workspace::Workspace;

/// Everything a tool needs for one agent turn: the workspace snapshot it
/// mutates, the hosted providers, and the retrieval thresholds. Passed in
/// explicitly — there is no ambient note state.
pub struct ToolExecutor<'a> {
    pub workspace: &'a mut Workspace,
    pub embedding: &'a dyn EmbeddingProvider,
    pub chat: &'a dyn ChatProvider,
    pub calendar: Option<&'a dyn CalendarProvider>,
    pub retrieval: &'a RetrievalConfig,
}

impl ToolExecutor<'_> {
    /// Execute one tool call. Never fails: unknown names, bad arguments, and
    /// downstream errors all come back as `{"error": ...}` records.
    pub async fn execute(&mut self, name: &str, args: &Value) -> Value {
        tracing::info!(tool = name, "executing tool");
        match name {
            "createNote" => create_note::run(self, args).await,
            "updateNote" => update_note::run(self, args).await,
            "deleteNote" => delete_note::run(self, args).await,
            "searchNotes" => search_notes::run(self, args).await,
            "ragAnswer" => rag_answer::run(self, args).await,
            "clusterNotes" => cluster_notes::run(self, args).await,
            "openNote" => open_note::run(self, args).await,
            "summarizeNote" => summarize_note::run(self, args).await,
            "rewriteNote" => rewrite_note::run(self, args).await,
            "createCalendarEvent" => create_calendar_event::run(self, args).await,
            other => json!({ "error": format!("Unknown tool: {other}") }),
        }
    }

    /// Embed a note's title + content, degrading to an empty vector.
    pub(crate) async fn embed_note(&self, title: &str, content: &str) -> Vec<f32> {
        embed_or_empty(self.embedding, &embedding_text(title, content)).await
    }
}

/// The full tool set declared to the model on every agent iteration.
pub fn declarations() -> Vec<FunctionDeclaration> {
    vec![
        declaration::<create_note::CreateNoteParams>(
            "createNote",
            "Create a new note with a title and content. Returns the new Note ID.",
        ),
        declaration::<update_note::UpdateNoteParams>(
            "updateNote",
            "Update an existing note. Only provide fields that need changing.",
        ),
        declaration::<delete_note::DeleteNoteParams>(
            "deleteNote",
            "Delete a note by ID. REQUIRE EXPLICIT USER CONFIRMATION BEFORE CALLING THIS.",
        ),
        declaration::<search_notes::SearchNotesParams>(
            "searchNotes",
            "Search for notes semantically using embeddings. Returns the top 5 matches \
             and flags which ones are highly relevant to the query.",
        ),
        declaration::<rag_answer::RagAnswerParams>(
            "ragAnswer",
            "Answer a specific question using a provided list of note IDs as context.",
        ),
        declaration::<cluster_notes::ClusterNotesParams>(
            "clusterNotes",
            "Re-organize all notes into semantic clusters.",
        ),
        declaration::<open_note::OpenNoteParams>(
            "openNote",
            "Open a specific note for the user to see.",
        ),
        declaration::<summarize_note::SummarizeNoteParams>(
            "summarizeNote",
            "Generate a summary for a specific note.",
        ),
        declaration::<rewrite_note::RewriteNoteParams>(
            "rewriteNote",
            "Rewrite or improve a note based on an instruction (e.g. \"fix grammar\", \"make concise\").",
        ),
        declaration::<create_calendar_event::CreateCalendarEventParams>(
            "createCalendarEvent",
            "Create a calendar event in the user's calendar using natural language. \
             The text should include the event details like \"Meeting with John tomorrow at 2pm\".",
        ),
    ]
}

fn declaration<T: JsonSchema>(name: &str, description: &str) -> FunctionDeclaration {
    let schema = schemars::schema_for!(T);
    let mut parameters = serde_json::to_value(&schema).expect("schema serializes");
    if let Some(obj) = parameters.as_object_mut() {
        // The model wants a bare parameter object, not a standalone schema.
        obj.remove("$schema");
        obj.remove("title");
    }
    FunctionDeclaration {
        name: name.into(),
        description: description.into(),
        parameters,
    }
}

/// Shorthand for the invalid-arguments error record.
pub(crate) fn bad_args(tool: &str, err: impl std::fmt::Display) -> Value {
    json!({ "error": format!("Invalid arguments for {tool}: {err}") })
}

/// Shorthand for a failed workspace write.
pub(crate) fn save_failed(err: impl std::fmt::Display) -> Value {
    json!({ "error": format!("Failed to save changes: {err}") })
}
