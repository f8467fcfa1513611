use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::genai::embed_or_empty;
use crate::notes::search::search_notes;
use crate::tools::{bad_args, ToolExecutor};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchNotesParams {
    #[schemars(description = "The search query")]
    pub query: String,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: SearchNotesParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("searchNotes", e),
    };

    let query_embedding = embed_or_empty(exec.embedding, &params.query).await;
    let hits = search_notes(
        exec.workspace.notes(),
        &query_embedding,
        exec.retrieval.search_floor,
        exec.retrieval.max_search_results,
    );

    let relevant = hits
        .iter()
        .filter(|h| h.score > exec.retrieval.relevance_threshold)
        .count();
    let message = if relevant > 0 {
        format!(
            "Found {} notes. {} are highly relevant (score > {}). \
             Use these note IDs with 'ragAnswer' for best results.",
            hits.len(),
            relevant,
            exec.retrieval.relevance_threshold,
        )
    } else {
        format!(
            "Found {} notes, but none are highly relevant. Consider refining your search query.",
            hits.len()
        )
    };

    json!({ "results": hits, "message": message })
}
