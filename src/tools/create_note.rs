use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::notes::types::Note;
use crate::tools::{bad_args, save_failed, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNoteParams {
    #[schemars(description = "Title of the note")]
    pub title: String,

    #[schemars(description = "The body content of the note")]
    pub content: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: CreateNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("createNote", e),
    };

    let embedding = exec.embed_note(&params.title, &params.content).await;
    let mut note = Note::new(params.title, params.content);
    note.embedding = Some(embedding);
    note.is_generated = true;
    let id = note.id.clone();

    if let Err(e) = exec.workspace.insert_note(note) {
        return save_failed(e);
    }
    json!({ "success": true, "noteId": id, "message": "Note created successfully." })
}
