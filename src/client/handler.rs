//! Client connection driver
//!
//! Opens the TCP connection and runs the player state machine over it.

use log::info;
use tokio::io::AsyncBufRead;
use tokio::net::TcpStream;

use crate::client::context::Context;
use crate::client::results::MatchReport;
use crate::client::state::{ClientState, run};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::protocol::MessageStream;

/// Connects to the server and plays one match to its end.
///
/// `input` supplies the player's typed lines (standard input in the binary).
pub async fn play<I>(config: &ClientConfig, input: I) -> Result<MatchReport, ClientError>
where
    I: AsyncBufRead + Unpin,
{
    let address = config.server_address();
    info!("Connecting to the server: {}", address);
    let stream = TcpStream::connect(&address)
        .await
        .map_err(|source| ClientError::Connect {
            address: address.clone(),
            source,
        })?;

    let mut ctx = Context::new(
        input,
        MessageStream::new(stream, config.max_frame_bytes),
        config.name.clone(),
        config.max_name_length,
    );
    run(&mut ctx, ClientState::Connected).await?;
    info!("Game over.");
    Ok(ctx.into_report())
}
