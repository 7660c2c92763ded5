use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::warn;

use gemini_live_gateway::{ServerConfig, handlers, routes, state::AppState};

/// Gemini Live Gateway - WebSocket relay to the Gemini Live API
#[derive(Parser, Debug)]
#[command(name = "gemini-live-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Override the bind host (takes precedence over HOST)
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port (takes precedence over PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; live sessions will be rejected with an error frame");
    }

    let address = config.address();
    let app_state = Arc::new(AppState::new(config));

    // Public health check route (no upgrade required)
    let public_routes = Router::new().route("/", axum::routing::get(handlers::api::health_check));

    let app = public_routes
        .merge(routes::ws::create_ws_router())
        .with_state(app_state);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;

    println!("Server listening on http://{}", socket_addr);

    let listener = TcpListener::bind(&socket_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
