//! Terminal commands.
//!
//! Each subcommand opens the workspace directly against the data directory;
//! the server does the same, so CLI and server must not run concurrently
//! against one workspace (last writer wins on the JSON blobs).

pub mod add;
pub mod chat;
pub mod delete;
pub mod export;
pub mod graph;
pub mod import;
pub mod organize;
pub mod re_embed;
pub mod related;
pub mod reset;
pub mod search;
pub mod show;
pub mod speak;
pub mod stats;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::MemoruniaConfig;
use crate::genai::gemini::GeminiClient;
use crate::notes::workspace::Workspace;
use crate::store::FileKvStore;

/// Open the workspace at the configured data directory.
pub(crate) fn open_workspace(config: &MemoruniaConfig) -> Result<Workspace> {
    let data_dir = config.resolved_data_dir();
    let store = FileKvStore::open(&data_dir)
        .with_context(|| format!("failed to open data dir: {}", data_dir.display()))?;
    Workspace::load(Box::new(store))
}

/// Build the hosted client from config plus `GEMINI_API_KEY`.
pub(crate) fn gemini(config: &MemoruniaConfig) -> Result<Arc<GeminiClient>> {
    Ok(Arc::new(GeminiClient::from_config(&config.genai)?))
}
