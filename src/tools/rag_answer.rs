//! Retrieval-augmented answering.
//!
//! Candidates are scored against the query embedding and gated at the
//! relevance threshold before any generation happens: with no qualifying
//! note the fixed refusal is returned and the model is never called.
//! Source attribution keeps only notes at or above the source threshold,
//! falling back to the top three by score.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::genai::embed_or_empty;
use crate::notes::types::Note;
use crate::similarity::score_against;
use crate::tools::{bad_args, ToolExecutor};

/// Returned when no candidate clears the relevance gate.
pub const REFUSAL: &str = "I couldn't find any relevant notes to answer your question. \
    The notes you referenced don't seem to contain information related to your query. \
    Try searching for more relevant notes first.";

const GENERATION_FAILED: &str = "Error generating answer.";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RagAnswerParams {
    #[schemars(description = "The user question")]
    pub query: String,

    #[schemars(description = "List of Note IDs to use as source material")]
    pub candidate_note_ids: Vec<String>,
}

pub(crate) async fn run(exec: &mut ToolExecutor<'_>, args: &Value) -> Value {
    let params: RagAnswerParams = match serde_json::from_value(args.clone()) {
        Ok(p) => p,
        Err(e) => return bad_args("ragAnswer", e),
    };

    let query_embedding = embed_or_empty(exec.embedding, &params.query).await;

    // Score the referenced candidates and keep only the relevant ones.
    let relevant: Vec<(Note, f32)> = params
        .candidate_note_ids
        .iter()
        .filter_map(|id| exec.workspace.find_note(id))
        .map(|n| {
            let score = score_against(&query_embedding, n.embedding.as_deref());
            (n.clone(), score)
        })
        .filter(|(_, score)| *score > exec.retrieval.relevance_threshold)
        .collect();

    if relevant.is_empty() {
        return json!({ "answer": REFUSAL, "usedNoteIds": [] });
    }

    let prompt = build_prompt(&params.query, &relevant);
    let answer = match exec.chat.generate_text(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "rag generation failed");
            return json!({ "answer": GENERATION_FAILED, "usedNoteIds": [] });
        }
    };

    let used = attribute_sources(&relevant, exec.retrieval.source_threshold);
    json!({ "answer": answer, "usedNoteIds": used })
}

fn build_prompt(query: &str, notes: &[(Note, f32)]) -> String {
    let context: Vec<String> = notes
        .iter()
        .map(|(n, score)| {
            format!(
                "Title: {} [Relevance: {:.0}%]\nContent: {}",
                n.title,
                score * 100.0,
                n.content
            )
        })
        .collect();

    format!(
        "Question: \"{query}\"\n\n\
         Context Notes (only use information from these notes):\n{}\n\n\
         Instructions:\n\
         - Answer the question STRICTLY using only the information from the context notes above.\n\
         - If the context notes don't contain enough information to answer the question, say so clearly.\n\
         - ALWAYS cite your sources at the end of your answer as a markdown list of note titles under a **Sources:** heading.\n\
         - Only cite notes that you actually used to answer the question.\n\
         - Format your answer with markdown for readability.",
        context.join("\n\n---\n\n")
    )
}

/// Notes scoring at or above `source_threshold`, or the top 3 by score when
/// none do.
fn attribute_sources(relevant: &[(Note, f32)], source_threshold: f32) -> Vec<String> {
    let high: Vec<String> = relevant
        .iter()
        .filter(|(_, score)| *score >= source_threshold)
        .map(|(n, _)| n.id.clone())
        .collect();
    if !high.is_empty() {
        return high;
    }

    let mut by_score: Vec<&(Note, f32)> = relevant.iter().collect();
    by_score.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    by_score.into_iter().take(3).map(|(n, _)| n.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str) -> Note {
        Note::new(title, "content")
    }

    #[test]
    fn high_relevance_sources_win() {
        let relevant = vec![(note("a"), 0.6), (note("b"), 0.4), (note("c"), 0.55)];
        let used = attribute_sources(&relevant, 0.5);
        assert_eq!(used.len(), 2);
        assert_eq!(used[0], relevant[0].0.id);
        assert_eq!(used[1], relevant[2].0.id);
    }

    #[test]
    fn falls_back_to_top_three() {
        let relevant = vec![
            (note("a"), 0.31),
            (note("b"), 0.45),
            (note("c"), 0.35),
            (note("d"), 0.40),
        ];
        let used = attribute_sources(&relevant, 0.5);
        assert_eq!(used.len(), 3);
        assert_eq!(used[0], relevant[1].0.id); // 0.45
        assert_eq!(used[1], relevant[3].0.id); // 0.40
        assert_eq!(used[2], relevant[2].0.id); // 0.35
    }

    #[test]
    fn prompt_includes_titles_and_scores() {
        let prompt = build_prompt("what?", &[(note("Grocery List"), 0.72)]);
        assert!(prompt.contains("Title: Grocery List [Relevance: 72%]"));
        assert!(prompt.contains("Question: \"what?\""));
    }
}
