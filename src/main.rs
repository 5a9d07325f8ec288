//! RPS Server - Entry Point
//!
//! Matches pairs of players and referees their rock-paper-scissors rounds.

use clap::Parser;
use log::info;
use std::process::ExitCode;

use rps_arena::Server;
use rps_arena::config::ServerConfig;
use rps_arena::error::RpsError;
use rps_arena::error::handlers::{error_to_exit_code, handle_error};
use rps_arena::utils::logging::setup_server_logging;

#[derive(Parser, Debug)]
#[command(name = "rps-server", about = "Rock-paper-scissors matchmaking server")]
struct Args {
    /// The network address to listen for connections
    #[arg(long)]
    host: Option<String>,

    /// The port to listen for connections
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    setup_server_logging();

    let args = Args::parse();
    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

async fn start(args: Args) -> Result<(), RpsError> {
    let mut config = ServerConfig::load()?;
    if let Some(host) = args.host {
        config.bind_address = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    info!("Starting RPS server...");
    let server = Server::bind(config).await?;
    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
