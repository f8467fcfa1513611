use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{bad_args, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenNoteParams {
    #[schemars(description = "The ID of the note to open")]
    pub note_id: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: OpenNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("openNote", e),
    };

    match exec.workspace.find_note(&params.note_id) {
        Some(note) => json!({
            "success": true,
            "message": "Note opened.",
            "note": { "id": note.id, "title": note.title, "content": note.content },
        }),
        None => json!({ "error": "Note not found" }),
    }
}
