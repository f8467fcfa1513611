//! Core note and cluster types.
//!
//! Defines [`Note`] (a single record with its optional embedding), [`Cluster`]
//! (an LLM-assigned grouping), and [`SearchHit`] (a scored search result).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single note.
///
/// The embedding, when present, has the fixed dimensionality of the configured
/// embedding model. An embedding-service failure is recorded as an empty
/// vector so the note still exists but never ranks in similarity queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Opaque unique identifier (UUID v4).
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Cluster this note was last assigned to, if any. May dangle after the
    /// note's cluster is replaced; lookups treat that as "unclustered".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Set on notes the agent created on the user's behalf.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_generated: bool,
}

impl Note {
    /// Build a new note with a fresh id and the current timestamp.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            embedding: None,
            cluster_id: None,
            is_generated: false,
        }
    }

    /// The canonical text fed to the embedding model for this note.
    pub fn embedding_text(&self) -> String {
        embedding_text(&self.title, &self.content)
    }
}

/// Title + content in the fixed layout the embedding model sees.
pub fn embedding_text(title: &str, content: &str) -> String {
    format!("Title: {title}\nContent: {content}")
}

/// An LLM-produced grouping of notes.
///
/// Clusters are produced wholesale by one clustering call; the previous
/// collection is always replaced, never merged. Note ids are not reconciled
/// against deletions — a dangling id simply resolves to no note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub note_ids: Vec<String>,
}

/// A scored search result, shaped for both tool results and the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    /// First 150 characters of the content.
    pub snippet: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_has_unique_id() {
        let a = Note::new("A", "alpha");
        let b = Note::new("B", "beta");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert!(!a.is_generated);
        assert!(a.embedding.is_none());
    }

    #[test]
    fn embedding_text_layout() {
        let n = Note::new("Grocery List", "Milk, eggs");
        assert_eq!(n.embedding_text(), "Title: Grocery List\nContent: Milk, eggs");
    }

    #[test]
    fn note_serde_roundtrip_skips_defaults() {
        let n = Note::new("T", "c");
        let json = serde_json::to_value(&n).unwrap();
        assert!(json.get("embedding").is_none());
        assert!(json.get("isGenerated").is_none());
        assert!(json.get("clusterId").is_none());

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, n.id);
        assert!(!back.is_generated);
    }
}
