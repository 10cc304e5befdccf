//! Maand Node - community platform API server.
//!
//! This is the main entry point for running the HTTP API.

use clap::Parser;
use maand_auth::CredentialStore;
use maand_node::api::{create_router, AppState, TracingMailer};
use maand_node::config::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Maand Node - community platform API
#[derive(Parser, Debug)]
#[command(name = "maand-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// HTTP listen address (overrides the config file)
    #[arg(long)]
    listen_addr: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("maand={},tower_http=debug", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Maand node");

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, path = %args.config.display(), "Failed to load configuration");
            std::process::exit(1);
        }
    };
    let listen_addr = args.listen_addr.unwrap_or(config.listen_addr);

    tracing::info!(
        listen_addr = %listen_addr,
        allowed_origins = ?config.allowed_origins,
        "Node configuration"
    );

    let state = AppState {
        store: Arc::new(CredentialStore::with_bearer_ttl(config.token_ttl_secs)),
        mailer: Arc::new(TracingMailer),
    };
    let app = create_router(state, &config.allowed_origins);

    let listener = match tokio::net::TcpListener::bind(listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %listen_addr, "Failed to bind listen address");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %listen_addr, "API listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
