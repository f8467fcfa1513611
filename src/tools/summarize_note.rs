use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::rewrite_note::rewrite_text;
use crate::tools::{bad_args, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeNoteParams {
    #[schemars(description = "The ID of the note to summarize")]
    pub note_id: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: SummarizeNoteParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("summarizeNote", e),
    };

    let Some(target) = exec.workspace.find_note(&params.note_id) else {
        return json!({ "error": "Note not found" });
    };

    let summary =
        rewrite_text(exec.chat, &target.content, "Summarize this in 2 sentences.").await;
    json!({ "summary": summary })
}
