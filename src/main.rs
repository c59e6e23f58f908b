mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

use video_ingest::api::{self, AppState};
use video_ingest::config::Config;
use video_ingest::handler::Event;
use video_ingest::observability;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();

    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    match cli.command {
        Commands::Serve(args) => {
            let address = args.address.unwrap_or(config.server.bind_addr);
            let state = AppState::from_config(config)?;
            api::run(state, address).await?
        }
        Commands::Invoke(args) => invoke(config, args.event).await?,
    }

    Ok(())
}

/// One-shot invocation: read an event, run the handler, print the envelope
async fn invoke(config: Config, event_path: Option<PathBuf>) -> Result<(), AnyError> {
    let raw = match event_path {
        Some(path) if path != Path::new("-") => tokio::fs::read(&path).await?,
        _ => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };

    let event: Event = serde_json::from_slice(&raw)?;
    let state = AppState::from_config(config)?;

    let response = state.handler.handle(event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
