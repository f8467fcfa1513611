use anyhow::Result;

use crate::config::MemoruniaConfig;

/// Display workspace statistics in the terminal.
pub fn stats(config: &MemoruniaConfig) -> Result<()> {
    let workspace = super::open_workspace(config)?;
    let notes = workspace.notes();

    let embedded = notes
        .iter()
        .filter(|n| n.embedding.as_ref().is_some_and(|e| !e.is_empty()))
        .count();
    let generated = notes.iter().filter(|n| n.is_generated).count();
    let clustered = notes.iter().filter(|n| n.cluster_id.is_some()).count();

    println!("Workspace Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total notes:     {}", notes.len());
    println!("  With embeddings: {embedded}");
    println!("  Agent-generated: {generated}");
    println!("  In a cluster:    {clustered}");
    println!("  Clusters:        {}", workspace.clusters().len());

    if let Some(oldest) = notes.iter().map(|n| n.created_at).min() {
        println!("  Oldest note:     {}", oldest.to_rfc3339());
    }
    if let Some(newest) = notes.iter().map(|n| n.created_at).max() {
        println!("  Newest note:     {}", newest.to_rfc3339());
    }
    Ok(())
}
