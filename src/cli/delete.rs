use anyhow::{bail, Result};

use crate::config::MemoruniaConfig;

/// Delete one note by id.
pub fn delete(config: &MemoruniaConfig, id: &str) -> Result<()> {
    let mut workspace = super::open_workspace(config)?;
    match workspace.remove_note(id)? {
        Some(note) => {
            println!("Note '{}' deleted.", note.title);
            Ok(())
        }
        None => bail!("no note with id {id}"),
    }
}
