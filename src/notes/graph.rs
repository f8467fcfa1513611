//! Semantic graph construction.
//!
//! Produces the node/edge payload the graph view renders: one node per note
//! (carrying its cluster assignment, if the cluster still exists) and one
//! undirected edge per note pair whose cosine similarity is strictly above
//! the edge threshold (0.65 by default).

use serde::Serialize;

use crate::notes::types::{Cluster, Note};
use crate::similarity::score_against;

#[derive(Debug, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f32,
}

#[derive(Debug, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Build the semantic graph over all notes.
///
/// Edges compare each unordered pair once; pairs at or below `threshold` are
/// dropped. Cluster names are resolved through the current cluster collection,
/// so a dangling cluster reference renders as unclustered.
pub fn build_graph(notes: &[Note], clusters: &[Cluster], threshold: f32) -> Graph {
    let nodes = notes
        .iter()
        .map(|n| GraphNode {
            id: n.id.clone(),
            title: n.title.clone(),
            cluster: cluster_name_for(n, clusters),
        })
        .collect();

    let mut edges = Vec::new();
    for (i, a) in notes.iter().enumerate() {
        let Some(emb_a) = a.embedding.as_deref() else {
            continue;
        };
        for b in &notes[i + 1..] {
            let sim = score_against(emb_a, b.embedding.as_deref());
            if sim > threshold {
                edges.push(GraphEdge {
                    source: a.id.clone(),
                    target: b.id.clone(),
                    weight: sim,
                });
            }
        }
    }

    Graph { nodes, edges }
}

fn cluster_name_for(note: &Note, clusters: &[Cluster]) -> Option<String> {
    clusters
        .iter()
        .find(|c| c.note_ids.iter().any(|id| *id == note.id))
        .map(|c| c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_with_embedding(title: &str, embedding: Vec<f32>) -> Note {
        let mut n = Note::new(title, "content");
        n.embedding = Some(embedding);
        n
    }

    /// Unit vector whose cosine against [1, 0] is exactly `cos`.
    fn at_angle(cos: f32) -> Vec<f32> {
        vec![cos, (1.0 - cos * cos).sqrt()]
    }

    #[test]
    fn edge_threshold_is_strict() {
        let a = note_with_embedding("a", vec![1.0, 0.0]);
        let connected = note_with_embedding("b", at_angle(0.7));
        let not_connected = note_with_embedding("c", at_angle(0.6));

        let graph = build_graph(&[a, connected, not_connected], &[], 0.65);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, graph.nodes[0].id);
        assert_eq!(graph.edges[0].target, graph.nodes[1].id);
        assert!((graph.edges[0].weight - 0.7).abs() < 1e-3);
    }

    #[test]
    fn unembedded_notes_get_no_edges() {
        let a = Note::new("blank", "c");
        let b = note_with_embedding("b", vec![1.0, 0.0]);
        let graph = build_graph(&[a, b], &[], 0.65);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn cluster_names_resolve_and_dangle_softly() {
        let a = note_with_embedding("a", vec![1.0, 0.0]);
        let clusters = vec![Cluster {
            id: "cluster-0".into(),
            name: "Tech".into(),
            note_ids: vec![a.id.clone(), "deleted-note".into()],
        }];

        let graph = build_graph(std::slice::from_ref(&a), &clusters, 0.65);
        assert_eq!(graph.nodes[0].cluster.as_deref(), Some("Tech"));
        // The dangling id produces no node and no error.
        assert_eq!(graph.nodes.len(), 1);
    }
}
