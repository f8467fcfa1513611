//! Embedding-based ranking over the note collection.
//!
//! Pure functions over a note slice and a query embedding. The thresholds
//! (0.05 search floor, 0.3 relevance, 0.65 related/graph edge) come from
//! [`crate::config::RetrievalConfig`]; defaults match the original fixed
//! constants.

use crate::notes::types::{Note, SearchHit};
use crate::similarity::score_against;

const SNIPPET_LEN: usize = 150;

/// Score every note against the query embedding, highest first.
///
/// Notes without an embedding (or with an empty one) score 0. The sort is
/// stable, so equal scores keep collection order.
pub fn rank_notes(notes: &[Note], query_embedding: &[f32]) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = notes
        .iter()
        .map(|n| SearchHit {
            id: n.id.clone(),
            title: n.title.clone(),
            snippet: snippet(&n.content),
            score: score_against(query_embedding, n.embedding.as_deref()),
        })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

/// Search: ranked hits above `floor`, capped at `limit`.
pub fn search_notes(
    notes: &[Note],
    query_embedding: &[f32],
    floor: f32,
    limit: usize,
) -> Vec<SearchHit> {
    rank_notes(notes, query_embedding)
        .into_iter()
        .filter(|h| h.score > floor)
        .take(limit)
        .collect()
}

/// Notes related to `note`: everything else scoring strictly above `threshold`.
pub fn related_notes<'a>(note: &Note, notes: &'a [Note], threshold: f32) -> Vec<(&'a Note, f32)> {
    let Some(embedding) = note.embedding.as_deref() else {
        return Vec::new();
    };
    let mut related: Vec<(&Note, f32)> = notes
        .iter()
        .filter(|n| n.id != note.id)
        .map(|n| (n, score_against(embedding, n.embedding.as_deref())))
        .filter(|(_, score)| *score > threshold)
        .collect();
    related.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    related
}

fn snippet(content: &str) -> String {
    if content.len() <= SNIPPET_LEN {
        return content.to_string();
    }
    let end = content
        .char_indices()
        .take_while(|(i, _)| *i < SNIPPET_LEN)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(SNIPPET_LEN);
    content[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_with(title: &str, spike: usize) -> Note {
        let mut v = vec![0.0f32; 8];
        v[spike] = 1.0;
        let mut n = Note::new(title, "content");
        n.embedding = Some(v);
        n
    }

    fn query(spike: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; 8];
        v[spike] = 1.0;
        v
    }

    #[test]
    fn rank_orders_by_score_descending() {
        let notes = vec![note_with("far", 1), note_with("near", 0)];
        let hits = rank_notes(&notes, &query(0));
        assert_eq!(hits[0].title, "near");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn search_drops_scores_at_or_below_floor() {
        let mut unembedded = Note::new("blank", "no vector");
        unembedded.embedding = None;
        let notes = vec![note_with("match", 0), note_with("miss", 1), unembedded];

        let hits = search_notes(&notes, &query(0), 0.05, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "match");
    }

    #[test]
    fn search_caps_at_limit() {
        // Eight notes all moderately similar to the query
        let notes: Vec<Note> = (0..8)
            .map(|i| {
                let mut n = Note::new(format!("n{i}"), "c");
                let mut v = vec![0.1f32; 8];
                v[i] = 1.0;
                n.embedding = Some(v);
                n
            })
            .collect();

        let hits = search_notes(&notes, &vec![0.5f32; 8], 0.05, 5);
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn equal_scores_keep_collection_order() {
        let notes = vec![note_with("a", 0), note_with("b", 0), note_with("c", 0)];
        let hits = rank_notes(&notes, &query(0));
        let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn related_applies_strict_threshold() {
        let base = note_with("base", 0);
        // cos = 0.7 with base
        let mut close = Note::new("close", "c");
        close.embedding = Some({
            let mut v = vec![0.0f32; 8];
            v[0] = 0.7;
            v[1] = (1.0f32 - 0.49).sqrt();
            v
        });
        // cos = 0.6 with base
        let mut far = Note::new("far", "c");
        far.embedding = Some({
            let mut v = vec![0.0f32; 8];
            v[0] = 0.6;
            v[1] = (1.0f32 - 0.36).sqrt();
            v
        });

        let all = vec![base.clone(), close, far];
        let related = related_notes(&base, &all, 0.65);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0.title, "close");
    }

    #[test]
    fn related_excludes_self_and_unembedded_base() {
        let base = note_with("base", 0);
        let all = vec![base.clone(), note_with("twin", 0)];
        let related = related_notes(&base, &all, 0.65);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0.title, "twin");

        let mut blank = Note::new("blank", "c");
        blank.embedding = None;
        assert!(related_notes(&blank, &all, 0.65).is_empty());
    }

    #[test]
    fn snippet_truncates_to_150() {
        let long = "x".repeat(400);
        assert_eq!(snippet(&long).len(), 150);
        assert_eq!(snippet("short"), "short");
    }
}
