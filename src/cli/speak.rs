use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::MemoruniaConfig;
use crate::genai::SpeechProvider;
use crate::speech::{write_wav, TTS_SAMPLE_RATE};

/// Synthesize a note's content into a WAV file.
pub async fn speak(config: &MemoruniaConfig, id: &str, out: Option<&Path>) -> Result<()> {
    let client = super::gemini(config)?;
    let workspace = super::open_workspace(config)?;

    let Some(note) = workspace.find_note(id) else {
        bail!("no note with id {id}");
    };

    println!("Synthesizing '{}'...", note.title);
    let pcm = client.synthesize(&note.content).await?;

    let default_path = PathBuf::from(format!("{id}.wav"));
    let path = out.unwrap_or(&default_path);
    write_wav(path, &pcm, TTS_SAMPLE_RATE)?;

    // 16-bit mono
    let seconds = pcm.len() as f64 / (TTS_SAMPLE_RATE as f64 * 2.0);
    println!("Wrote {} ({seconds:.1}s of audio).", path.display());
    Ok(())
}
