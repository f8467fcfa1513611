use anyhow::{bail, Result};

use crate::config::MemoruniaConfig;
use crate::notes::search::related_notes;

/// Show the notes most similar to one note.
pub fn related(config: &MemoruniaConfig, id: &str) -> Result<()> {
    let workspace = super::open_workspace(config)?;
    let Some(note) = workspace.find_note(id) else {
        bail!("no note with id {id}");
    };

    let related = related_notes(
        note,
        workspace.notes(),
        config.retrieval.graph_edge_threshold,
    );
    if related.is_empty() {
        println!("No related notes for '{}'.", note.title);
        return Ok(());
    }

    println!("Notes related to '{}':\n", note.title);
    for (other, score) in related {
        println!("  {} (score: {:.4}) [{}]", other.title, score, other.id);
    }
    Ok(())
}
