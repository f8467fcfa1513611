use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{bad_args, save_failed, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteParams {
    #[schemars(description = "The ID of the note to delete")]
    pub note_id: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: DeleteNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("deleteNote", e),
    };

    if exec.workspace.find_note(&params.note_id).is_none() {
        return json!({ "error": "Note not found." });
    }

    match exec.workspace.remove_note(&params.note_id) {
        Ok(Some(removed)) => json!({
            "success": true,
            "message": format!("Note '{}' deleted.", removed.title),
        }),
        Ok(None) => json!({ "error": "Note not found." }),
        Err(e) => save_failed(e),
    }
}
