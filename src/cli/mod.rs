//! Command-line interface.

mod ask;

use anyhow::Result;
use clap::{Parser, Subcommand};

use llmcall::ClientConfig;

pub(crate) const DEFAULT_SELF_TEST_PROMPT: &str =
    "Explain the concept of 'duck typing' in Python in one sentence.";

#[derive(Debug, Parser)]
#[command(name = "llmcall", version, about = "Cached, logged prompts against a local Ollama model")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Send one prompt and print the response.
    Ask {
        /// Prompt text.
        prompt: String,
        /// Skip the response cache for this call.
        #[arg(long)]
        no_cache: bool,
    },
    /// Clear the cache, call twice with caching and once without.
    SelfTest {
        /// Prompt to send.
        #[arg(long, default_value = DEFAULT_SELF_TEST_PROMPT)]
        prompt: String,
    },
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env();
    match cli.command {
        Commands::Ask { prompt, no_cache } => ask::cmd_ask(&config, &prompt, !no_cache).await,
        Commands::SelfTest { prompt } => self_test::cmd_self_test(&config, &prompt).await,
    }
}
