//! # strategos
//!
//! War Game Directive generator: an HTTP server streaming directives and
//! follow-up chat, or a one-shot CLI that streams a directive to stdout.

#![deny(unsafe_code)]

mod wiring;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use strategos_engine::DirectiveRequest;
use strategos_server::ServerConfig;
use strategos_settings::{load_settings, load_settings_from_path, StrategosSettings};
use strategos_telemetry::{init_telemetry, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "strategos", about = "AI Legal Strategos directive generator")]
struct Cli {
    /// Settings file (default `~/.strategos/settings.json`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server until Ctrl-C.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Stream one directive to stdout.
    Generate {
        /// Case facts as text.
        #[arg(long, conflicts_with = "facts_file")]
        facts: Option<String>,
        /// Read case facts from a file.
        #[arg(long)]
        facts_file: Option<PathBuf>,
        /// High-level instruction for every section.
        #[arg(long)]
        instruction: Option<String>,
    },
}

fn load(config: Option<&PathBuf>) -> Result<StrategosSettings> {
    let settings = match config {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_settings().context("Failed to load settings")?,
    };
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();
    let mut settings = load(cli.config.as_ref())?;
    init_telemetry(&TelemetryConfig::from_settings(&settings.logging));

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(&settings).await
        }
        Command::Generate {
            facts,
            facts_file,
            instruction,
        } => {
            let facts = match (facts, facts_file) {
                (Some(facts), _) => facts,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Provide --facts or --facts-file"),
            };
            if facts.trim().is_empty() {
                bail!("Case facts are empty");
            }
            let mut request = DirectiveRequest::new(facts);
            request.instruction = instruction;
            generate(&settings, request).await
        }
    }
}

async fn serve(settings: &StrategosSettings) -> Result<()> {
    let config = ServerConfig::from_settings(&settings.server);
    let services = wiring::build_services(settings);
    let handle = strategos_server::start(config.clone(), services)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!(port = handle.port(), "strategos ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;
    info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

async fn generate(settings: &StrategosSettings, request: DirectiveRequest) -> Result<()> {
    let orchestrator = wiring::build_orchestrator(settings);
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut stdout = tokio::io::stdout();
    let mut tokens = std::pin::pin!(orchestrator.run(request, cancel));
    while let Some(token) = tokens.next().await {
        stdout.write_all(token.render().as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
