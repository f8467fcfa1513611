use anyhow::{bail, Result};

use crate::config::MemoruniaConfig;

/// Print one note in full.
pub fn show(config: &MemoruniaConfig, id: &str) -> Result<()> {
    let workspace = super::open_workspace(config)?;
    let Some(note) = workspace.find_note(id) else {
        bail!("no note with id {id}");
    };

    println!("{}", note.title);
    println!("{}", "=".repeat(note.title.len().max(8)));
    println!("  id:      {}", note.id);
    println!("  created: {}", note.created_at.to_rfc3339());
    if let Some(cluster_id) = &note.cluster_id {
        let name = workspace
            .clusters()
            .iter()
            .find(|c| &c.id == cluster_id)
            .map(|c| c.name.as_str())
            .unwrap_or(cluster_id.as_str());
        println!("  cluster: {name}");
    }
    println!();
    println!("{}", note.content);
    Ok(())
}
