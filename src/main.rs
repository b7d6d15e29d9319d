use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cartpilot::config::{
    ClientConfig, RelayConfig, DEFAULT_API_URL, DEFAULT_BASE_URL, DEFAULT_CATALOG_PATH,
    DEFAULT_PORT, DEFAULT_TEXT_MODEL, DEFAULT_TIMEOUT_SECS, DEFAULT_VISION_MODEL,
};
use cartpilot::{chat, web_server};

const DEFAULT_LOG_FILTER: &str = "cartpilot=info,tower_http=info";

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the chat relay server.
    Serve {
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, help = "Completion API key.")]
        api_key: String,
        #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, help = "Base URL of the completion API.")]
        base_url: String,
        #[arg(long, env = "CATALOG_PATH", default_value = DEFAULT_CATALOG_PATH, help = "Product catalog JSON file.")]
        catalog: PathBuf,
        #[arg(long, env = "VISION_MODEL", default_value = DEFAULT_VISION_MODEL, help = "Model used when an image is attached.")]
        vision_model: String,
        #[arg(long, env = "TEXT_MODEL", default_value = DEFAULT_TEXT_MODEL, help = "Model used for text-only requests.")]
        text_model: String,
        #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, help = "Timeout for completion API calls.")]
        timeout_secs: u64,
    },
    /// Chat with a running relay from the terminal.
    Chat {
        #[arg(long, env = "CARTPILOT_API_URL", default_value = DEFAULT_API_URL, help = "Base URL of the relay API.")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            api_key,
            base_url,
            catalog,
            vision_model,
            text_model,
            timeout_secs,
        } => {
            info!("Starting CartPilot relay on port {}...", port);
            let config = RelayConfig {
                port,
                api_key,
                base_url,
                catalog_path: catalog,
                vision_model,
                text_model,
                timeout_secs,
            };
            web_server::start_web_server(config)
                .await
                .context("Relay server failed")?;
        }
        Commands::Chat { api_url } => {
            chat::run_chat(ClientConfig { api_url })
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}
