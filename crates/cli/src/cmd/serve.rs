//! Serve command: the protocol server on stdio.

use obsidian_core::config::ResolvedConfig;
use obsidian_mcp::start_server;
use tracing::info;

use crate::error::CliError;

pub fn run(config: &ResolvedConfig) -> Result<(), CliError> {
    // stdout carries protocol frames only
    if config.verbose {
        eprintln!("Starting MCP server for vault: {}", config.vault_root.display());
        eprintln!("Server will run until interrupted (Ctrl+C)");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io("failed to start async runtime", e))?;

    let result = runtime.block_on(async {
        tokio::select! {
            served = start_server(config) => served
                .map_err(|e| CliError::Failed(format!("protocol server failed: {e:#}"))),
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                Ok(())
            }
        }
    });
    // the stdin reader may still be parked on a blocking read
    runtime.shutdown_background();

    if config.verbose {
        eprintln!("MCP server stopped.");
    }
    result
}
