//! MCP server over HTTP.
//!
//! Resolves auth settings, loads the server instructions, and serves the
//! SSE and POST transports until Ctrl+C.

use crate::auth::{Auth0Verifier, TokenVerifier};
use crate::cli::Output;
use crate::config::Settings;
use crate::instructions::{InstructionLoader, SERVER_INSTRUCTIONS};
use crate::mcp::{router, AppState, McpServer, MESSAGES_PATH};
use crate::transcript::TranscriptFetcher;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Run the MCP server.
///
/// `host` and `port` override the configured bind address.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> Result<()> {
    let auth = settings.auth.resolve()?;

    let loader = InstructionLoader::new(settings.prompts.resolve_dir());
    let instructions = loader
        .load(SERVER_INSTRUCTIONS)
        .await
        .with_context(|| format!("Failed to load server instructions from {}", loader.dir().display()))?;

    if settings.proxy.credentials().is_err() {
        warn!("Proxy credentials are not configured; transcript requests will fail");
    }

    let verifier: Arc<dyn TokenVerifier> = Arc::new(Auth0Verifier::new(&auth));
    let fetcher = TranscriptFetcher::from_settings(&settings);
    let server = McpServer::new(&settings.server.name, instructions, fetcher, loader);

    let issuer = auth.issuer_url.clone();
    let resource = auth.resource_server_url.clone();
    let app = router(AppState::new(server, verifier, auth));

    let host = host.unwrap_or(settings.server.host.as_str());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, %issuer, "MCP server listening");

    Output::header(&format!("{} MCP Server", settings.server.name));
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Issuer", &issuer);
    Output::kv("Resource", &resource);
    println!();
    println!("Endpoints:");
    Output::kv("SSE", "GET  /sse");
    Output::kv("Messages", &format!("POST {}?session_id=..", MESSAGES_PATH));
    Output::kv("JSON-RPC", "POST /mcp");
    Output::kv("Metadata", "GET  /.well-known/oauth-protected-resource");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
