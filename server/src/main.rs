//! HEMIS MCP server binary. Serves the tool registry over stdio; logs go
//! to stderr so the transport stream stays clean.

use anyhow::Context;
use hemis_api::{FileTokenStore, HemisClient, HemisConfig, TokenCache};
use hemis_mcp_server::{Dispatcher, HemisService};
use rmcp::{transport::stdio, ServiceExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = HemisConfig::from_env().context("loading HEMIS configuration")?;
    info!(base_url = %config.base_url, "Starting HEMIS MCP server");

    let client = HemisClient::new(&config.base_url)?;
    let tokens = TokenCache::new(
        client.clone(),
        Box::new(FileTokenStore::new(&config.token_cache_path)),
        config
            .credentials()
            .map(|(login, password)| (login.to_string(), password.to_string())),
        config.token_ttl,
    );

    let service = HemisService::new(Dispatcher::new(client, tokens));
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
