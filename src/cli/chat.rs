use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

use crate::agent::{Agent, ChatMessage, Role};
use crate::calendar::{CalendarProvider, GoogleCalendar};
use crate::config::MemoruniaConfig;
use crate::genai::{ChatProvider, EmbeddingProvider};
use crate::speech::{StdinTranscriptSource, TranscriptSource};

/// Interactive agent session in the terminal.
///
/// Reads utterances from any [`TranscriptSource`]; the terminal entry point
/// wires in stdin. An empty source (EOF) or "exit"/"quit" ends the session.
pub async fn chat(config: &MemoruniaConfig) -> Result<()> {
    let mut source = StdinTranscriptSource;
    run(config, &mut source).await
}

pub async fn run(config: &MemoruniaConfig, source: &mut dyn TranscriptSource) -> Result<()> {
    let client = super::gemini(config)?;
    let chat: Arc<dyn ChatProvider> = client.clone();
    let embedding: Arc<dyn EmbeddingProvider> = client;

    let calendar: Option<Arc<dyn CalendarProvider>> = if config.calendar.is_configured() {
        Some(Arc::new(GoogleCalendar::new(config.calendar.clone())))
    } else {
        None
    };

    let mut workspace = super::open_workspace(config)?;
    let mut agent = Agent::new(chat, embedding, calendar, config.retrieval.clone());

    if let Some(greeting) = agent.transcript().first().and_then(|m| m.content.clone()) {
        println!("{greeting}\n");
    }

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = source.next_utterance()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let messages = agent.run_turn(&mut workspace, line).await;
        for message in &messages {
            print_message(message);
        }
        println!();
    }

    println!("Bye.");
    Ok(())
}

fn print_message(message: &ChatMessage) {
    if message.role == Role::User {
        return;
    }
    for call in &message.tool_calls {
        println!("  [tool] {}({})", call.name, call.args);
    }
    if let Some(content) = &message.content {
        println!("{content}");
    }
    if !message.source_note_ids.is_empty() {
        println!("Sources: {}", message.source_note_ids.join(", "));
    }
}
