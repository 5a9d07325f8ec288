//! RPS Client - Entry Point
//!
//! Joins a server as one player and plays a single match from the terminal.

use clap::Parser;
use log::{info, warn};
use std::process::ExitCode;
use tokio::io::BufReader;

use rps_arena::client::{MatchReport, play};
use rps_arena::config::ClientConfig;
use rps_arena::error::RpsError;
use rps_arena::error::handlers::{error_to_exit_code, handle_error, is_client_disconnect};
use rps_arena::utils::logging::setup_client_logging;

#[derive(Parser, Debug)]
#[command(name = "rps-client", about = "Play rock-paper-scissors against another player")]
struct Args {
    /// The IP address or hostname of the server
    #[arg(long)]
    host: Option<String>,

    /// The port of the server
    #[arg(long)]
    port: Option<u16>,

    /// The name of the player; asked interactively when omitted
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_client_logging();
    info!("Welcome to the RPS client");

    let args = Args::parse();
    match start(args).await {
        Ok(report) => {
            summarize(&report);
            info!("Client was closed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if matches!(&e, RpsError::Client(client_error) if is_client_disconnect(client_error)) {
                warn!("The server closed the connection before the match ended.");
            }
            handle_error(&e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

async fn start(args: Args) -> Result<MatchReport, RpsError> {
    let mut config = ClientConfig::load()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.name.is_some() {
        config.name = args.name;
    }
    config.validate()?;

    let input = BufReader::new(tokio::io::stdin());
    Ok(play(&config, input).await?)
}

fn summarize(report: &MatchReport) {
    let opponent = report.opponent_name.as_deref().unwrap_or("unknown");
    match report.final_outcome() {
        Some(outcome) => info!(
            "{} vs {}: you {} after {} round(s) ({} draw(s)).",
            report.player_name,
            opponent,
            outcome,
            report.rounds.len(),
            report.draws()
        ),
        None => info!("{} vs {}: no rounds played.", report.player_name, opponent),
    }
}
