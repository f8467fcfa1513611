//! CLI `re-embed` command — regenerate all note embeddings with the current model.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::MemoruniaConfig;
use crate::genai::EmbeddingProvider;

/// Re-embed every note with the currently configured embedding model.
///
/// A note whose embedding call fails keeps its old vector so a transient
/// outage never strips the collection.
pub async fn re_embed(config: &MemoruniaConfig) -> Result<()> {
    let client = super::gemini(config)?;
    let mut workspace = super::open_workspace(config)?;

    let total = workspace.notes().len();
    if total == 0 {
        println!("No notes to re-embed.");
        return Ok(());
    }

    println!(
        "Re-embedding {total} note(s) with model '{}'...",
        config.genai.embedding_model
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut notes = workspace.notes().to_vec();
    let mut failed = 0u64;

    for note in &mut notes {
        match client.embed(&note.embedding_text()).await {
            Ok(vector) => note.embedding = Some(vector),
            Err(err) => {
                eprintln!("Warning: failed to embed '{}': {err}", note.title);
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    workspace.replace_notes(notes)?;

    println!("Re-embedded {} note(s).", total as u64 - failed);
    if failed > 0 {
        println!("  Kept old vectors for {failed} note(s) that failed.");
    }
    Ok(())
}
