//! Cosine similarity over dense embedding vectors.
//!
//! Every ranking decision in the crate — search order, related notes, graph
//! edges, retrieval gating — reduces to [`cosine_similarity`] plus a fixed
//! threshold from [`crate::config::RetrievalConfig`].

/// Cosine similarity of two vectors, in `[-1.0, 1.0]`.
///
/// Returns exactly `0.0` when the vectors have mismatched lengths, when either
/// is empty, or when either has zero norm. Callers treat a missing embedding
/// as an empty vector, so a note that failed to embed simply never ranks.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Similarity between a query embedding and an optional note embedding.
///
/// `None` scores 0, same as an empty vector.
pub fn score_against(query: &[f32], embedding: Option<&[f32]>) -> f32 {
    match embedding {
        Some(e) => cosine_similarity(query, e),
        None => 0.0,
    }
}
