use anyhow::Result;

use crate::config::MemoruniaConfig;
use crate::genai::embed_or_empty;
use crate::notes::search::search_notes;

/// Run a semantic search from the terminal.
pub async fn search(config: &MemoruniaConfig, query: &str) -> Result<()> {
    let client = super::gemini(config)?;
    let workspace = super::open_workspace(config)?;

    let query_embedding = embed_or_empty(client.as_ref(), query).await;
    let hits = search_notes(
        workspace.notes(),
        &query_embedding,
        config.retrieval.search_floor,
        config.retrieval.max_search_results,
    );

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        println!("  {}. {} (score: {:.4})", i + 1, hit.title, hit.score);
        println!("     {} [{}]", hit.snippet, hit.id);
        println!();
    }
    Ok(())
}
