//! The note workspace — collections plus their persistence shim.
//!
//! [`Workspace`] owns the in-memory note and cluster collections and the
//! [`KvStore`] they are serialized into. Every mutation replaces a collection
//! wholesale and immediately rewrites its blob, mirroring the original
//! write-on-every-change design. Mutators never edit a note in place from the
//! outside: callers construct the replacement and the workspace swaps it in.

use anyhow::Result;
use tracing::warn;

use crate::notes::types::{Cluster, Note};
use crate::store::{KvStore, CLUSTERS_KEY, NOTES_KEY};

pub struct Workspace {
    notes: Vec<Note>,
    clusters: Vec<Cluster>,
    store: Box<dyn KvStore>,
}

impl Workspace {
    /// Load both collections from the store.
    ///
    /// An absent blob loads as an empty collection. So does a corrupt one:
    /// parse failure is logged and treated as empty rather than refusing to
    /// start.
    pub fn load(store: Box<dyn KvStore>) -> Result<Self> {
        let notes = read_collection(store.as_ref(), NOTES_KEY)?;
        let clusters = read_collection(store.as_ref(), CLUSTERS_KEY)?;
        Ok(Self {
            notes,
            clusters,
            store,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn find_note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Prepend a note (newest first, as the card list displays them).
    pub fn insert_note(&mut self, note: Note) -> Result<()> {
        self.notes.insert(0, note);
        self.persist_notes()
    }

    /// Swap in a replacement for the note with the same id.
    ///
    /// Returns `false` (without persisting) when no note has that id.
    pub fn replace_note(&mut self, note: Note) -> Result<bool> {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) else {
            return Ok(false);
        };
        *slot = note;
        self.persist_notes()?;
        Ok(true)
    }

    /// Remove a note by id. Returns the removed note, or `None` if absent
    /// (in which case nothing is written).
    pub fn remove_note(&mut self, id: &str) -> Result<Option<Note>> {
        let Some(pos) = self.notes.iter().position(|n| n.id == id) else {
            return Ok(None);
        };
        let removed = self.notes.remove(pos);
        self.persist_notes()?;
        Ok(Some(removed))
    }

    /// Replace the entire note collection.
    pub fn replace_notes(&mut self, notes: Vec<Note>) -> Result<()> {
        self.notes = notes;
        self.persist_notes()
    }

    /// Replace the entire cluster collection. Clusters are never merged.
    pub fn replace_clusters(&mut self, clusters: Vec<Cluster>) -> Result<()> {
        self.clusters = clusters;
        self.persist_clusters()
    }

    /// Drop everything, both in memory and in the store.
    pub fn clear(&mut self) -> Result<()> {
        self.notes.clear();
        self.clusters.clear();
        self.store.remove(NOTES_KEY)?;
        self.store.remove(CLUSTERS_KEY)?;
        Ok(())
    }

    fn persist_notes(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.notes)?;
        self.store.set(NOTES_KEY, &blob)
    }

    fn persist_clusters(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.clusters)?;
        self.store.set(CLUSTERS_KEY, &blob)
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Vec<T>> {
    let Some(blob) = store.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&blob) {
        Ok(items) => Ok(items),
        Err(err) => {
            warn!(key, %err, "persisted blob failed to parse, starting empty");
            Ok(Vec::new())
        }
    }
}
