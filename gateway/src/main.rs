//! Generation gateway entry point

use std::net::SocketAddr;

use clap::Parser;

use gateway::{AnthropicClient, Gateway, GatewayError, GatewayResult, GatewayState};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(about = "HTTP gateway proxying component generation to the Claude API")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server-side fallback API key (defaults to ANTHROPIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> GatewayResult<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    shared::logging::init_tracing("gateway", Some(&args.log_level));

    let server_api_key = args
        .api_key
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
    if server_api_key.is_none() {
        tracing::warn!("no server-side API key configured; requests must carry their own apiKey");
    }

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| GatewayError::config(format!("invalid bind address: {e}")))?;

    let gateway = Gateway::new(GatewayState::new(server_api_key), AnthropicClient::new());
    gateway.run(bind_address).await?;

    shared::logging::log_success("gateway", "gateway stopped gracefully");
    Ok(())
}
