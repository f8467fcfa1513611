//! LLM-driven clustering.
//!
//! Sends id + digest pairs for every note to the model with a JSON response
//! schema and replaces the entire cluster collection with whatever comes
//! back. Any request or parse failure yields an empty cluster list — the
//! previous clusters are still replaced, never merged.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::genai::wire::Content;
use crate::notes::types::Cluster;
use crate::tools::{save_failed, ToolExecutor};

const DIGEST_LEN: usize = 100;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClusterNotesParams {
    #[schemars(description = "Approximate number of clusters (default 5)")]
    pub k: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCluster {
    name: String,
    #[serde(default)]
    note_ids: Vec<String>,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, _args: &Value) -> Value {
    // `k` is advisory only; the model decides the actual grouping.
    let clusters = generate_clusters(exec).await;
    let names: Vec<String> = clusters.iter().map(|c| c.name.clone()).collect();

    // Stamp the new assignments onto the notes; unassigned notes lose any
    // previous cluster id.
    let mut notes = exec.workspace.notes().to_vec();
    for note in &mut notes {
        note.cluster_id = clusters
            .iter()
            .find(|c| c.note_ids.iter().any(|id| *id == note.id))
            .map(|c| c.id.clone());
    }
    if let Err(e) = exec.workspace.replace_notes(notes) {
        return save_failed(e);
    }

    if let Err(e) = exec.workspace.replace_clusters(clusters) {
        return save_failed(e);
    }
    json!({ "success": true, "clusters": names })
}

async fn generate_clusters(exec: &ToolExecutor<'_>) -> Vec<Cluster> {
    let notes = exec.workspace.notes();
    if notes.is_empty() {
        return Vec::new();
    }

    let digests: Vec<Value> = notes
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "content": format!("{}: {}", n.title, digest(&n.content)),
            })
        })
        .collect();

    let contents = vec![
        Content::user_text(serde_json::to_string(&digests).unwrap_or_default()),
        Content::user_text(
            "Group these notes into clusters. Return JSON: [{ \"name\": \"...\", \"noteIds\": [\"...\"] }]",
        ),
    ];
    let schema = json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "noteIds": { "type": "array", "items": { "type": "string" } }
            }
        }
    });

    let raw = match exec.chat.generate_json(contents, schema).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "clustering call failed");
            return Vec::new();
        }
    };

    parse_clusters(&raw)
}

/// Parse the model's cluster JSON, stripping markdown fences first.
/// Returns an empty list on any parse failure.
fn parse_clusters(raw: &str) -> Vec<Cluster> {
    let cleaned = strip_fences(raw);
    let parsed: Vec<RawCluster> = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(%err, "clustering output failed to parse");
            return Vec::new();
        }
    };

    let stamp = chrono::Utc::now().timestamp_millis();
    parsed
        .into_iter()
        .enumerate()
        .map(|(idx, c)| Cluster {
            id: format!("cluster-{idx}-{stamp}"),
            name: c.name,
            note_ids: c.note_ids,
        })
        .collect()
}

/// Models sometimes wrap JSON in ```json fences despite the response mime type.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn digest(content: &str) -> &str {
    let end = content
        .char_indices()
        .take_while(|(i, _)| *i < DIGEST_LEN)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(content.len().min(DIGEST_LEN));
    &content[..end.min(content.len())]
}
