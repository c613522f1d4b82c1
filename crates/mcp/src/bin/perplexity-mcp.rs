// Standalone MCP server binary

use anyhow::{Context, Result};
use perplexity_mcp::server::McpServer;
use perplexity_mcp::tools::{SearchTool, ToolRegistry};
use perplexity_sdk::{ClientConfig, PerplexityClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(run());

    // The blocking stdin reader can't be cancelled, so don't wait for it.
    runtime.shutdown_background();
    result
}

async fn run() -> Result<()> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");

    let client = PerplexityClient::from_config(config).context("Failed to create HTTP client")?;

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchTool::new(client)));

    let server = McpServer::new(registry);

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    tracing::info!("Perplexity MCP server running on stdio");
    server.run_stdio(shutdown).await?;

    tracing::info!("Perplexity MCP server stopped");
    Ok(())
}

async fn shutdown_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received interrupt"),
        _ = terminate => tracing::info!("Received terminate"),
    }

    shutdown.cancel();
}
