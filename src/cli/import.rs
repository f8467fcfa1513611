use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::config::MemoruniaConfig;
use crate::genai::embed_or_empty;
use crate::notes::types::{embedding_text, Note};

const MAX_TITLE_LEN: usize = 60;

/// Import plain-text or markdown files as notes.
///
/// Directories are scanned one level deep for `.md` and `.txt` files. A file
/// that cannot be read is reported and skipped, the rest still import.
pub async fn import(config: &MemoruniaConfig, paths: &[PathBuf]) -> Result<()> {
    let client = super::gemini(config)?;
    let mut workspace = super::open_workspace(config)?;

    let files = collect_files(paths)?;
    if files.is_empty() {
        println!("No .md or .txt files to import.");
        return Ok(());
    }

    println!("Importing {} file(s)...", files.len());
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut imported = 0u64;
    let mut skipped = 0u64;

    for file in &files {
        let text = match std::fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Warning: failed to read {}: {e}", file.display());
                skipped += 1;
                pb.inc(1);
                continue;
            }
        };

        let title = derive_title(file, &text);
        let embedding = embed_or_empty(client.as_ref(), &embedding_text(&title, &text)).await;
        let mut note = Note::new(title, text);
        note.embedding = Some(embedding);
        workspace.insert_note(note)?;

        imported += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("Import complete:");
    println!("  Notes imported: {imported}");
    if skipped > 0 {
        println!("  Files skipped:  {skipped}");
    }
    Ok(())
}

/// Title heuristic: the first non-empty line (minus markdown heading markers)
/// when it is short enough, otherwise the file stem.
fn derive_title(path: &Path, text: &str) -> String {
    let first_line = text
        .lines()
        .map(|l| l.trim_start_matches('#').trim())
        .find(|l| !l.is_empty());

    match first_line {
        Some(line) if line.len() < MAX_TITLE_LEN => line.to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string()),
    }
}

fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries {
                let candidate = entry?.path();
                if candidate.is_file() && is_importable(&candidate) {
                    files.push(candidate);
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    Ok(files)
}

fn is_importable(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("txt")
    )
}
