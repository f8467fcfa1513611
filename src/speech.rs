//! Speech I/O seams.
//!
//! The hosted TTS endpoint returns raw 24 kHz mono PCM; [`write_wav`] wraps it
//! in a WAV container for playback outside the process. [`TranscriptSource`]
//! is the injected dictation capability: the chat REPL reads from it, and the
//! default implementation is line-buffered stdin.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Sample rate of the hosted TTS output.
pub const TTS_SAMPLE_RATE: u32 = 24_000;

/// A source of user utterances. Stdin by default; a speech recognizer in a
/// richer frontend.
pub trait TranscriptSource {
    /// Block for the next utterance. `None` means the source is exhausted.
    fn next_utterance(&mut self) -> Result<Option<String>>;
}

/// Line-buffered stdin transcript source.
pub struct StdinTranscriptSource;

impl TranscriptSource for StdinTranscriptSource {
    fn next_utterance(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Write 16-bit LE mono PCM samples as a WAV file.
pub fn write_wav(path: impl AsRef<Path>, pcm: &[u8], sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let mut out = std::io::BufWriter::new(
        std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?,
    );

    let byte_rate = sample_rate * 2; // mono, 16-bit
    let data_len = pcm.len() as u32;

    out.write_all(b"RIFF")?;
    out.write_all(&(36 + data_len).to_le_bytes())?;
    out.write_all(b"WAVE")?;
    out.write_all(b"fmt ")?;
    out.write_all(&16u32.to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?; // PCM
    out.write_all(&1u16.to_le_bytes())?; // mono
    out.write_all(&sample_rate.to_le_bytes())?;
    out.write_all(&byte_rate.to_le_bytes())?;
    out.write_all(&2u16.to_le_bytes())?; // block align
    out.write_all(&16u16.to_le_bytes())?; // bits per sample
    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())?;
    out.write_all(pcm)?;
    out.flush()?;
    Ok(())
}
