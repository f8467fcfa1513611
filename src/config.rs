use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoruniaConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub genai: GenAiConfig,
    pub retrieval: RetrievalConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the notes/clusters JSON blobs.
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenAiConfig {
    /// Base URL of the hosted generative API.
    pub api_base: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub tts_model: String,
    pub tts_voice: String,
}

/// Similarity thresholds and bounds. Defaults match the original fixed
/// constants; they are configurable here but tests pin the defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Scores at or below this never appear in search results.
    pub search_floor: f32,
    /// "Relevant" gate for retrieval-augmented answers and search flagging.
    pub relevance_threshold: f32,
    /// "Highly relevant" gate for source attribution.
    pub source_threshold: f32,
    /// Strict lower bound for semantic-graph edges and related notes.
    pub graph_edge_threshold: f32,
    pub max_search_results: usize,
    /// Model round-trip cap for one agent turn.
    pub max_agent_iterations: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CalendarConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub calendar_id: String,
}

impl Default for MemoruniaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            genai: GenAiConfig::default(),
            retrieval: RetrievalConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7171,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = default_memorunia_dir()
            .join("data")
            .to_string_lossy()
            .into_owned();
        Self { data_dir }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            chat_model: "gemini-2.5-flash-lite".into(),
            embedding_model: "text-embedding-004".into(),
            tts_model: "gemini-2.5-flash-preview-tts".into(),
            tts_voice: "Kore".into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_floor: 0.05,
            relevance_threshold: 0.3,
            source_threshold: 0.5,
            graph_edge_threshold: 0.65,
            max_search_results: 5,
            max_agent_iterations: 5,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            calendar_id: "primary".into(),
        }
    }
}

impl CalendarConfig {
    /// The calendar tool only works once all three OAuth fields are set.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.refresh_token.is_empty()
    }
}

/// Returns `~/.memorunia/`
pub fn default_memorunia_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".memorunia")
}

/// Returns the default config file path: `~/.memorunia/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memorunia_dir().join("config.toml")
}

impl MemoruniaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemoruniaConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MEMORUNIA_DATA, MEMORUNIA_LOG_LEVEL).
    /// The API key is always read from `GEMINI_API_KEY` and never from the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMORUNIA_DATA") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("MEMORUNIA_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the data directory, expanding `~` if needed.
    pub fn resolved_data_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.data_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MemoruniaConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.retrieval.search_floor, 0.05);
        assert_eq!(config.retrieval.relevance_threshold, 0.3);
        assert_eq!(config.retrieval.source_threshold, 0.5);
        assert_eq!(config.retrieval.graph_edge_threshold, 0.65);
        assert_eq!(config.retrieval.max_search_results, 5);
        assert_eq!(config.retrieval.max_agent_iterations, 5);
        assert!(config.storage.data_dir.ends_with("data"));
        assert!(!config.calendar.is_configured());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9090

[storage]
data_dir = "/tmp/memorunia-test"

[genai]
chat_model = "gemini-next"

[retrieval]
max_search_results = 10
"#;
        let config: MemoruniaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.data_dir, "/tmp/memorunia-test");
        assert_eq!(config.genai.chat_model, "gemini-next");
        assert_eq!(config.retrieval.max_search_results, 10);
        // defaults still apply for unset fields
        assert_eq!(config.retrieval.graph_edge_threshold, 0.65);
        assert_eq!(config.genai.embedding_model, "text-embedding-004");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MemoruniaConfig::default();
        std::env::set_var("MEMORUNIA_DATA", "/tmp/override-data");
        std::env::set_var("MEMORUNIA_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.data_dir, "/tmp/override-data");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("MEMORUNIA_DATA");
        std::env::remove_var("MEMORUNIA_LOG_LEVEL");
    }

    #[test]
    fn calendar_configured_requires_all_fields() {
        let mut cal = CalendarConfig::default();
        cal.client_id = "id".into();
        cal.client_secret = "secret".into();
        assert!(!cal.is_configured());
        cal.refresh_token = "token".into();
        assert!(cal.is_configured());
    }
}
