//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};
use verbatim_core::{Comparator, Config};

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio; nothing to configure yet
}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let comparator =
        Comparator::from_config(&config).context("invalid normalization rules in configuration")?;
    let server = ProjectServer::with_comparator(comparator, max_input_bytes);

    info!(min_words = server.min_words(), "starting MCP server on stdio");
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server task failed")?;
    info!(?reason, "MCP server stopped");
    Ok(())
}
