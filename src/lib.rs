//! llmcall: cached, logged prompts against a local Ollama model.
//!
//! ```no_run
//! # async fn demo() -> llmcall::Result<()> {
//! let client = llmcall::LlmClient::from_env()?;
//! let answer = client.call("Explain duck typing in one sentence.", true).await;
//! if llmcall::is_error_response(&answer) {
//!     eprintln!("{}", answer);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;

pub use cache::{CacheMap, CacheStore};
pub use client::LlmClient;
pub use config::ClientConfig;
pub use error::{is_error_response, CacheError, LlmError, Result, ERROR_PREFIX};
pub use logging::CallLog;
pub use providers::{GenerateBackend, OllamaBackend};
