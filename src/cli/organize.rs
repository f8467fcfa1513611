use anyhow::Result;
use serde_json::json;

use crate::config::MemoruniaConfig;
use crate::tools::ToolExecutor;

/// Re-cluster all notes. Same code path as the agent's clusterNotes tool.
pub async fn organize(config: &MemoruniaConfig) -> Result<()> {
    let client = super::gemini(config)?;
    let mut workspace = super::open_workspace(config)?;

    if workspace.notes().is_empty() {
        println!("No notes to organize.");
        return Ok(());
    }

    println!("Organizing {} note(s)...", workspace.notes().len());

    let mut executor = ToolExecutor {
        workspace: &mut workspace,
        embedding: client.as_ref(),
        chat: client.as_ref(),
        calendar: None,
        retrieval: &config.retrieval,
    };
    executor.execute("clusterNotes", &json!({})).await;

    if workspace.clusters().is_empty() {
        println!("Clustering produced no clusters.");
        return Ok(());
    }

    println!("Created {} cluster(s):", workspace.clusters().len());
    for cluster in workspace.clusters() {
        println!("  {} ({} notes)", cluster.name, cluster.note_ids.len());
    }
    Ok(())
}
