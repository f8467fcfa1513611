use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{bad_args, save_failed, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteParams {
    #[schemars(description = "The ID of the note to update")]
    pub note_id: String,

    #[schemars(description = "New title (optional)")]
    pub title: Option<String>,

    #[schemars(description = "New content (optional)")]
    pub content: Option<String>,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: UpdateNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("updateNote", e),
    };

    let Some(target) = exec.workspace.find_note(&params.note_id) else {
        return json!({ "error": "Note not found." });
    };
    let mut updated = target.clone();

    let changed = params.title.is_some() || params.content.is_some();
    if let Some(title) = params.title {
        updated.title = title;
    }
    if let Some(content) = params.content {
        updated.content = content;
    }
    // Re-embed only when the text actually changed
    if changed {
        updated.embedding = Some(exec.embed_note(&updated.title, &updated.content).await);
    }

    match exec.workspace.replace_note(updated) {
        Ok(true) => json!({ "success": true, "message": "Note updated." }),
        Ok(false) => json!({ "error": "Note not found." }),
        Err(e) => save_failed(e),
    }
}
