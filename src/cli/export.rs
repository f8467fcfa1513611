use anyhow::Result;
use serde::Serialize;

use crate::config::MemoruniaConfig;
use crate::notes::types::{Cluster, Note};

/// Export format — wraps both collections.
#[derive(Debug, Serialize)]
struct ExportData {
    notes: Vec<Note>,
    clusters: Vec<Cluster>,
}

/// Export all notes and clusters as JSON to stdout.
pub fn export(config: &MemoruniaConfig) -> Result<()> {
    let workspace = super::open_workspace(config)?;

    let data = ExportData {
        notes: workspace.notes().to_vec(),
        clusters: workspace.clusters().to_vec(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} note(s) and {} cluster(s).",
        data.notes.len(),
        data.clusters.len()
    );
    Ok(())
}
