//! Cached, logged access to the inference backend.
//!
//! A call moves through at most two states: `SeekingCache` (only when caching
//! is requested) and `CallingEndpoint` (cache disabled or missed). Either way
//! it ends by returning a response string. No retries.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::logging::CallLog;
use crate::providers::{GenerateBackend, OllamaBackend};

/// Prompt-in, text-out client.
pub struct LlmClient {
    backend: Box<dyn GenerateBackend>,
    cache: CacheStore,
    log: Arc<CallLog>,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("backend", &self.backend.name())
            .field("cache", &self.cache.path())
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    pub fn new(
        backend: Box<dyn GenerateBackend>,
        cache: CacheStore,
        log: Arc<CallLog>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            cache,
            log,
            model: model.into(),
        }
    }

    /// Ollama client configured from `config`, logging to the process-wide
    /// call log.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let log = CallLog::init(&config.log_dir);
        let backend = OllamaBackend::new(&config.host)?;
        let cache = CacheStore::new(config.cache_path.clone(), log.clone());
        Ok(Self::new(Box::new(backend), cache, log, config.model.clone()))
    }

    /// [`from_config`](Self::from_config) over [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Send `prompt`, returning the response or a sentinel error string.
    ///
    /// Endpoint failures come back as
    /// `"Error: Could not get response from Ollama. Details: ..."`; use
    /// [`is_error_response`](crate::error::is_error_response) to tell them
    /// apart, or call [`try_call`](Self::try_call) for a typed error.
    pub async fn call(&self, prompt: &str, use_cache: bool) -> String {
        match self.try_call(prompt, use_cache).await {
            Ok(text) => text,
            Err(e) => e.sentinel(),
        }
    }

    /// [`call`](Self::call) with caching enabled.
    pub async fn call_cached(&self, prompt: &str) -> String {
        self.call(prompt, true).await
    }

    /// Send `prompt`, reporting endpoint failure as an error.
    ///
    /// Cache read and write failures are logged and never returned.
    pub async fn try_call(&self, prompt: &str, use_cache: bool) -> Result<String> {
        self.log.info(&format!("PROMPT: {}", prompt));

        if use_cache {
            let cache = self.cache.load();
            if let Some(cached) = CacheStore::lookup(&cache, prompt) {
                self.log.info(&format!("RESPONSE (cached): {}", cached));
                return Ok(cached.clone());
            }
        }

        let backend = self.backend.name();
        self.log.info(&format!("Calling {} model: {}", backend, self.model));

        let text = match self.backend.generate(&self.model, prompt).await {
            Ok(raw) => raw.trim().to_string(),
            Err(e) => {
                self.log.error(&format!("Error calling {}: {}", backend, e));
                return Err(e);
            }
        };
        self.log.info(&format!("RESPONSE ({}): {}", backend, text));

        if use_cache {
            self.cache.insert(prompt, &text);
        }

        Ok(text)
    }
}
