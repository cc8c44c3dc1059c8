//! API server configuration, loadable from TOML or environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tw_knowledge::EmbeddingConfig;

use crate::llm::LlmConfig;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "TABLEWISE_CONFIG";

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. None keeps bookings in memory.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Seats available per (date, time) slot.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
    /// Allowed CORS origins.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Idle lifetime of a chat session.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Generative model settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Knowledge base settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

/// Knowledge base settings.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory of `*.txt` documents.
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Passages retrieved per inquiry.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Build the index from `path` when the server starts.
    #[serde(default = "default_true")]
    pub init_on_startup: bool,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_capacity() -> u32 {
    50
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("./data/knowledge_base")
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_top_k() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            init_on_startup: true,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            max_capacity: default_max_capacity(),
            cors_origins: default_cors_origins(),
            session_ttl_secs: default_session_ttl_secs(),
            llm: LlmConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load from the TOML file named by `TABLEWISE_CONFIG`, else from the environment.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::from_env()),
        }
    }

    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup; unset or unparseable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = parsed("PORT").and_then(|p| u16::try_from(p).ok()) {
            config.port = port;
        }
        config.database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        if let Some(cap) = parsed("MAX_CAPACITY").and_then(|c| u32::try_from(c).ok()) {
            config.max_capacity = cap;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(ttl) = parsed("SESSION_TTL_SECS") {
            config.session_ttl_secs = ttl;
        }

        if let Some(url) = lookup("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            config.llm.model = model;
        }
        config.llm.api_key = lookup("GROQ_API_KEY").filter(|v| !v.is_empty());
        if let Some(secs) = parsed("LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = secs;
        }

        if let Some(path) = lookup("KNOWLEDGE_BASE_PATH") {
            config.knowledge.path = PathBuf::from(path);
        }
        if let Some(flag) = lookup("KNOWLEDGE_INIT_ON_STARTUP") {
            config.knowledge.init_on_startup = flag.eq_ignore_ascii_case("true") || flag == "1";
        }
        if let Some(provider) = lookup("EMBEDDING_PROVIDER") {
            config.knowledge.embedding.provider = provider;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            config.knowledge.embedding.model = model;
        }
        config.knowledge.embedding.api_key = lookup("EMBEDDING_API_KEY").filter(|v| !v.is_empty());

        config
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_capacity, 50);
        assert!(config.database_url.is_none());
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.knowledge.top_k, 3);
        assert_eq!(config.knowledge.chunk_size, 1000);
        assert_eq!(config.knowledge.chunk_overlap, 100);
    }

    #[test]
    fn env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9090"),
            ("MAX_CAPACITY", "80"),
            ("GROQ_API_KEY", "gsk-test"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("KNOWLEDGE_INIT_ON_STARTUP", "false"),
            ("SESSION_TTL_SECS", "60"),
        ]
        .into_iter()
        .collect();
        let config = ApiConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 9090);
        assert_eq!(config.max_capacity, 80);
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!config.knowledge.init_on_startup);
        assert_eq!(config.session_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn unparseable_env_values_keep_defaults() {
        let config = ApiConfig::from_lookup(|k| match k {
            "MAX_CAPACITY" => Some("lots".into()),
            "PORT" => Some("99999".into()),
            "DATABASE_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.max_capacity, 50);
        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn deserialize_toml_with_sections() {
        let toml = r#"
port = 8080
max_capacity = 30
database_url = "postgres://localhost/tablewise"

[llm]
model = "llama-3.1-8b-instant"
timeout_secs = 10

[knowledge]
path = "/srv/kb"
top_k = 5

[knowledge.embedding]
provider = "openai"
"#;
        let config: ApiConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_capacity, 30);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.knowledge.path, PathBuf::from("/srv/kb"));
        assert_eq!(config.knowledge.top_k, 5);
        assert_eq!(config.knowledge.chunk_size, 1000);
        assert_eq!(config.knowledge.embedding.provider, "openai");
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablewise.toml");
        std::fs::write(&path, "max_capacity = 12\n").unwrap();
        let config = ApiConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_capacity, 12);
    }
}
