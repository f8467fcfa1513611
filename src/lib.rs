//! Memorunia — an agentic personal note workspace.
//!
//! Notes live in a JSON-backed workspace, get dense embeddings from a hosted
//! model, and are queried three ways: direct semantic search, a similarity
//! graph, and a tool-calling agent that reads and writes notes on the user's
//! behalf.
//!
//! # Architecture
//!
//! - **Storage**: whole-collection JSON blobs behind the [`store::KvStore`]
//!   seam, files on disk by default
//! - **Retrieval**: cosine similarity over hosted embeddings, fixed
//!   thresholds in [`config::RetrievalConfig`]
//! - **Agent**: bounded tool-calling loop over the Gemini generateContent
//!   API, ten note tools plus an optional Google Calendar hook
//! - **Surfaces**: an axum REST server and a set of terminal subcommands
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`notes`] — Note and cluster types, workspace persistence, search, graph
//! - [`genai`] — Hosted embedding/chat/TTS clients behind provider traits
//! - [`tools`] — The agent's tool surface
//! - [`agent`] — The bounded conversational agent loop

pub mod agent;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod genai;
pub mod notes;
pub mod server;
pub mod similarity;
pub mod speech;
pub mod store;
pub mod tools;
