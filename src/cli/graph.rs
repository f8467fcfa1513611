use anyhow::Result;

use crate::config::MemoruniaConfig;
use crate::notes::graph::build_graph;

/// Print the similarity graph as JSON.
pub fn graph(config: &MemoruniaConfig) -> Result<()> {
    let workspace = super::open_workspace(config)?;
    let graph = build_graph(
        workspace.notes(),
        workspace.clusters(),
        config.retrieval.graph_edge_threshold,
    );

    println!("{}", serde_json::to_string_pretty(&graph)?);
    eprintln!(
        "{} node(s), {} edge(s).",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(())
}
