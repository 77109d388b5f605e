use std::path::PathBuf;

use ankita_core::Config;
use ankita_core::bootstrap::bootstrap;
use ankita_gateway::GatewayServer;
use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Physiotherapy question answering over a local document index",
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "ANKITA_CONFIG", default_value = "config/default.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    config.validate()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    run(&config, shutdown_rx).await
}

/// Initialize every component, then serve until shutdown.
///
/// The listener is bound only after initialization succeeds.
async fn run(config: &Config, mut shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;

    let chain = tokio::select! {
        result = bootstrap(config) => match result {
            Ok(chain) => chain,
            Err(e) => {
                tracing::error!("failed to initialize components: {e}");
                return Err(e).context("startup aborted");
            }
        },
        Ok(_) = shutdown_rx.wait_for(|stop| *stop) => {
            tracing::info!("shutdown requested during startup");
            return Ok(());
        }
    };
    tracing::info!(documents = chain.document_count(), "initialization complete");

    GatewayServer::new(addr, chain, shutdown_rx)
        .with_max_body_size(config.server.max_body_size)
        .with_error_status(config.server.error_status)
        .serve()
        .await?;

    Ok(())
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
