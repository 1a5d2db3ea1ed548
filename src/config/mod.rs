//! Environment-driven configuration.
//!
//! Every setting has a fixed default so the client works with no
//! environment at all. Empty variables are treated as unset.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selects the directory holding the daily call log.
pub const LOG_DIR_ENV: &str = "LOG_DIR";
/// Selects the model identifier sent with each generate request.
pub const MODEL_ENV: &str = "OLLAMA_MODEL";
/// Base URL of the Ollama server.
pub const HOST_ENV: &str = "OLLAMA_HOST";
/// Overrides the cache file location.
pub const CACHE_FILE_ENV: &str = "LLM_CACHE_FILE";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_MODEL: &str = "qwen2.5-32k";
pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_CACHE_FILE: &str = "llm_cache.json";

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ollama base URL, always with a scheme.
    pub host: String,
    /// Model identifier.
    pub model: String,
    /// Cache file path, relative to the working directory unless absolute.
    pub cache_path: PathBuf,
    /// Directory for `llm_calls_<YYYYMMDD>.log`.
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl ClientConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            host: get(HOST_ENV)
                .map(|h| normalize_host(&h))
                .unwrap_or(defaults.host),
            model: get(MODEL_ENV).unwrap_or(defaults.model),
            cache_path: get(CACHE_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            log_dir: get(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        };
        debug!(
            host = %config.host,
            model = %config.model,
            cache = %config.cache_path.display(),
            log_dir = %config.log_dir.display(),
            "Resolved client config"
        );
        config
    }

    /// Log directory from the environment alone, for the process-wide logger.
    pub fn log_dir_from_env() -> PathBuf {
        std::env::var(LOG_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }
}

/// Accept `OLLAMA_HOST` values like `0.0.0.0:11434` or `myhost` the way the
/// Ollama client does: add `http://` when no scheme is given, add the default
/// port when none is given, and drop a trailing slash.
pub fn normalize_host(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) => (scheme.to_string(), rest),
        None => ("http".to_string(), raw),
    };
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let has_port = authority
        .rsplit_once(':')
        .map(|(_, port)| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    let authority = if authority.is_empty() {
        "localhost:11434".to_string()
    } else if has_port {
        authority.to_string()
    } else {
        let port = if scheme == "https" { 443 } else { 11434 };
        format!("{}:{}", authority, port)
    };
    format!("{}://{}{}", scheme, authority, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let cfg = ClientConfig::from_lookup(|_| None);
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.model, "qwen2.5-32k");
        assert_eq!(cfg.cache_path, PathBuf::from("llm_cache.json"));
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_env_overrides() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            (MODEL_ENV, "llama3"),
            (LOG_DIR_ENV, "/var/log/llm"),
            (CACHE_FILE_ENV, "/tmp/cache.json"),
            (HOST_ENV, "http://gpu-box:11434"),
        ]));
        assert_eq!(cfg.model, "llama3");
        assert_eq!(cfg.log_dir, PathBuf::from("/var/log/llm"));
        assert_eq!(cfg.cache_path, PathBuf::from("/tmp/cache.json"));
        assert_eq!(cfg.host, "http://gpu-box:11434");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg =
            ClientConfig::from_lookup(lookup_from(&[(MODEL_ENV, "  "), (LOG_DIR_ENV, "")]));
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost"), "http://localhost:11434");
        assert_eq!(normalize_host("0.0.0.0:8080"), "http://0.0.0.0:8080");
        assert_eq!(normalize_host("http://example.com/"), "http://example.com:11434");
        assert_eq!(normalize_host("https://example.com"), "https://example.com:443");
        assert_eq!(
            normalize_host("http://127.0.0.1:11434/proxy"),
            "http://127.0.0.1:11434/proxy"
        );
        assert_eq!(normalize_host(""), "http://localhost:11434");
    }

    #[test]
    fn test_config_deserializes_partial_json() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"model":"mistral"}"#).unwrap();
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.host, DEFAULT_HOST);
    }
}
