//! Configuration management for Provenance Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Default minimum similarity for a snippet match (0-100 scale).
pub const DEFAULT_MIN_SCORE: f64 = 55.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub extraction: ExtractionConfig,
    pub matching: MatchingConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// OpenAI-compatible API base, without trailing slash
    pub base_url: String,
    /// Fallback API key when the request supplies none
    pub api_key: Option<String>,
    /// Default model when the request names none
    pub model: String,
    pub timeout_secs: u64,
    /// Extra root certificate (PEM) for TLS-intercepting deployments
    pub ca_bundle: Option<PathBuf>,
    /// Outbound proxy URL
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity for a snippet match; lower is more permissive
    pub min_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Maximum indexed documents held in memory before LRU eviction
    pub max_documents: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            extraction: ExtractionConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-4.1-mini".to_string(),
                timeout_secs: 120,
                ca_bundle: None,
                proxy: None,
            },
            matching: MatchingConfig {
                min_score: DEFAULT_MIN_SCORE,
            },
            registry: RegistryConfig { max_documents: 64 },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            extraction: ExtractionConfig {
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: env::var("EXTRACTION_MODEL")
                    .unwrap_or_else(|_| "gpt-4.1-mini".to_string()),
                timeout_secs: env::var("EXTRACTION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
                ca_bundle: env::var("EXTRACTION_CA_BUNDLE").ok().map(PathBuf::from),
                proxy: env::var("EXTRACTION_PROXY").ok(),
            },
            matching: MatchingConfig {
                min_score: env::var("MIN_MATCH_SCORE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MIN_SCORE)
                    .clamp(0.0, 100.0),
            },
            registry: RegistryConfig {
                max_documents: env::var("MAX_DOCUMENTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(64),
            },
        }
    }
}
