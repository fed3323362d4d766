use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub document: DocumentConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            document: DocumentConfig::from_env(),
            retrieval: RetrievalConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:     host={}, port={}", self.server.host, self.server.port);
        tracing::info!("  document:   file={}, chunk_size={}", self.document.file.display(), self.document.chunk_size);
        tracing::info!("  retrieval:  top_k={}", self.retrieval.top_k);
        tracing::info!("  embedding:  provider={}, dimensions={}", self.embedding.provider, self.embedding.dimensions);
        tracing::info!("  llm:        provider={}, configured={}", self.llm.provider, self.llm.is_configured());
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 5001),
        }
    }
}

// ── Document / chunking ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the plain-text corpus file read once at startup.
    pub file: PathBuf,
    /// Words per chunk (the final chunk of a document may be shorter).
    pub chunk_size: usize,
}

impl DocumentConfig {
    fn from_env() -> Self {
        Self {
            file: PathBuf::from(env_or("DOCS_FILE", "docs.txt")),
            // A zero chunk size would make chunking meaningless — clamp to 1.
            chunk_size: env_usize("CHUNK_SIZE", 300).max(1),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// How many chunks to pull into the answer context.
    pub top_k: usize,
}

impl RetrievalConfig {
    fn from_env() -> Self {
        Self {
            top_k: env_usize("RETRIEVAL_TOP_K", 3).max(1),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai"
    pub provider: String,
    pub dimensions: usize,
    pub batch_size: usize,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("EMBEDDING_PROVIDER", "ollama"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 768),
            batch_size: env_usize("EMBEDDING_BATCH_SIZE", 64).max(1),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── LLM (answer generation) ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "ollama"
    pub provider: String,
    /// Required when provider is "gemini" — there is deliberately no
    /// hardcoded fallback key.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("LLM_PROVIDER", "gemini"),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.2"),
            temperature: env_or("LLM_TEMPERATURE", "0.1").parse().unwrap_or(0.1),
            max_tokens: env_opt("LLM_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}
