use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use rustdoc_impls::DocState;
use rustdoc_impls::cli::Cli;
use rustdoc_impls::detection::DocRootConfig;
use rustdoc_impls::server::ImplServer;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the MCP protocol.
    rustdoc_impls::tracing::init();

    tracing::info!("Starting rustdoc-impls MCP server");

    let state = Arc::new(DocState::new());

    // Index in the background so the server answers the handshake immediately.
    let config = DocRootConfig::from_cli(&cli);
    let startup_state = Arc::clone(&state);
    tokio::spawn(async move {
        let cwd = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!("Failed to get current working directory: {}", e);
                return;
            }
        };
        let Some(root) = config.resolve(&cwd) else {
            tracing::info!("No doc root detected; waiting for set_doc_root");
            return;
        };
        if let Err(e) = startup_state.set_doc_root(root).await {
            tracing::warn!("Failed to index detected doc root: {:#}", e);
        }
    });

    let server = ImplServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
