use anyhow::Result;

use crate::config::MemoruniaConfig;
use crate::genai::embed_or_empty;
use crate::notes::types::{embedding_text, Note};

/// Create a note from the command line.
pub async fn add(config: &MemoruniaConfig, title: &str, content: &str) -> Result<()> {
    let client = super::gemini(config)?;
    let mut workspace = super::open_workspace(config)?;

    let embedding = embed_or_empty(client.as_ref(), &embedding_text(title, content)).await;

    let mut note = Note::new(title, content);
    note.embedding = Some(embedding);
    let id = note.id.clone();
    workspace.insert_note(note)?;

    println!("Created note {id}");
    Ok(())
}
