//! One-shot prompt command.

use anyhow::{Context, Result};

use llmcall::{ClientConfig, LlmClient};

/// Print the response to `prompt`. Endpoint failures are printed like any
/// other response, matching the client's return-as-data contract, but turn
/// into a non-zero exit.
pub(crate) async fn cmd_ask(config: &ClientConfig, prompt: &str, use_cache: bool) -> Result<()> {
    let client = LlmClient::from_config(config).with_context(|| "Failed to build client")?;
    let response = client.call(prompt, use_cache).await;
    println!("{}", response);
    if llmcall::is_error_response(&response) {
        anyhow::bail!("model call failed");
    }
    Ok(())
}
