//! Ollama `/api/generate` backend.
//!
//! Sends `{"model", "prompt", "stream": false}` and reads the `response`
//! field of the single JSON reply. No request timeout is set; a slow model
//! blocks the call for as long as the server takes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{LlmError, Result};

use super::GenerateBackend;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Backend speaking the Ollama REST API.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    host: String,
    client: Client,
}

impl OllamaBackend {
    /// `host` is a base URL such as `http://localhost:11434`.
    pub fn new(host: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("llmcall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/api/generate", self.host)
    }

    /// Pull a readable message out of an Ollama error body, which is
    /// normally `{"error": "..."}`.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"].as_str().map(String::from))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl GenerateBackend for OllamaBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        debug!(model, url = %self.api_url(), "Ollama generate request");

        let response = self
            .client
            .post(self.api_url())
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("{}: {}", e, body.trim())))?;
        debug!(model, chars = parsed.response.len(), "Ollama generate response");
        Ok(parsed.response)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
