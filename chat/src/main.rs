use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use hemis_chat::orchestrator::is_quit;
use hemis_chat::{LlmClient, McpSession, Orchestrator};

/// Interactive chat client for the HEMIS MCP server.
#[derive(Parser)]
#[command(name = "hemis-chat", version)]
struct Args {
    /// Command that starts the MCP server
    server_command: String,

    /// Arguments passed to the server command
    #[arg(trailing_var_arg = true)]
    server_args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let llm = LlmClient::from_env().context("failed to configure LLM client")?;
    let session = McpSession::connect(&args.server_command, &args.server_args)
        .await
        .context("failed to connect to MCP server")?;
    let orchestrator = Orchestrator::new(llm, Box::new(session));

    println!("\nMCP Client Started!");
    println!("Type your queries or 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nQuery: ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_quit(query) {
            break;
        }

        match orchestrator.process_query(query).await {
            Ok(response) => println!("\n{response}"),
            Err(err) => println!("\nError: {err}"),
        }
    }

    Ok(())
}
