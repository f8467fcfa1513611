use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::genai::ChatProvider;
use crate::tools::{bad_args, save_failed, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewriteNoteParams {
    #[schemars(description = "The ID of the note to rewrite")]
    pub note_id: String,

    #[schemars(description = "What to do (e.g. \"make it professional\")")]
    pub instruction: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: RewriteNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("rewriteNote", e),
    };

    let Some(target) = exec.workspace.find_note(&params.note_id) else {
        return json!({ "error": "Note not found" });
    };
    let mut updated = target.clone();

    updated.content = rewrite_text(exec.chat, &updated.content, &params.instruction).await;
    updated.embedding = Some(exec.embed_note(&updated.title, &updated.content).await);

    match exec.workspace.replace_note(updated) {
        Ok(true) => json!({ "success": true, "message": "Note rewritten and saved." }),
        Ok(false) => json!({ "error": "Note not found" }),
        Err(e) => save_failed(e),
    }
}

/// Rewrite `content` per `instruction`. Generation failure returns the
/// original text untouched, so a model outage degrades to a no-op edit.
pub(crate) async fn rewrite_text(
    chat: &dyn ChatProvider,
    content: &str,
    instruction: &str,
) -> String {
    let prompt =
        format!("Rewrite this text based on instruction: \"{instruction}\"\n\nText:\n{content}");
    match chat.generate_text(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "rewrite generation failed, keeping original text");
            content.to_string()
        }
    }
}
