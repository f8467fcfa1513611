//! CLI `reset` command — delete all notes after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::MemoruniaConfig;

/// Delete all notes and clusters after user confirmation.
pub fn reset(config: &MemoruniaConfig) -> Result<()> {
    let data_dir = config.resolved_data_dir();

    println!("WARNING: This will permanently delete ALL notes and clusters.");
    println!("Data directory: {}", data_dir.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut workspace = super::open_workspace(config)?;
    workspace.clear()?;

    println!("All notes deleted. Workspace reset complete.");
    Ok(())
}
