//! Room coordination server for watch-together sessions.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chanoma-server
//! cargo run --bin chanoma-server -- --host 0.0.0.0 --port 3000 --log-level debug
//! ```

use std::time::Duration;

use chanoma_server::ui::{Server, ServerConfig};
use chanoma_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chanoma-server")]
#[command(about = "Room coordination server for watch-together sessions", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds between the shutdown notice and closing open sockets
    #[arg(long, default_value = "5")]
    shutdown_grace_secs: u64,

    /// Seconds after which an unfinished shutdown exits the process
    #[arg(long, default_value = "30")]
    shutdown_timeout_secs: u64,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        ServerConfig::default()
            .host(args.host.clone())
            .port(args.port)
            .shutdown_grace(Duration::from_secs(args.shutdown_grace_secs))
            .shutdown_timeout(Duration::from_secs(args.shutdown_timeout_secs))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(
        &[env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "tower_http"],
        &args.log_level,
    );

    let server = Server::new(ServerConfig::from(&args));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
