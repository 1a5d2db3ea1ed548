//! Inference backends.
//!
//! [`GenerateBackend`] is the single seam between [`LlmClient`] and the
//! network. Production code uses [`OllamaBackend`]; tests substitute their
//! own implementations.
//!
//! [`LlmClient`]: crate::client::LlmClient

pub mod ollama;

use async_trait::async_trait;

use crate::error::Result;

pub use ollama::OllamaBackend;

/// One-shot, non-streaming text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    /// Generate a completion of `prompt` with `model`.
    ///
    /// Returns the raw generated text; callers trim it.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;

    /// Human-readable backend name used in log lines.
    fn name(&self) -> &str;
}
