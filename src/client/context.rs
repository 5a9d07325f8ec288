//! Client processing context
//!
//! Bundles the player's input, the server connection, and what has been
//! learned about the match so far. States borrow it while they run.

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite};

use crate::client::results::{MatchReport, RoundRecord};
use crate::error::{ClientError, CodecError, ProtocolError};
use crate::game::{Outcome, Selection};
use crate::protocol::{Message, MessageStream};
use crate::utils::validation::validate_name;

pub struct Context<I, S> {
    input: I,
    stream: MessageStream<S>,
    preset_name: Option<String>,
    max_name_length: usize,
    last_selection: Option<Selection>,
    report: MatchReport,
}

impl<I, S> Context<I, S>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `preset_name` skips the name prompt when set.
    pub fn new(
        input: I,
        stream: MessageStream<S>,
        preset_name: Option<String>,
        max_name_length: usize,
    ) -> Self {
        Self {
            input,
            stream,
            preset_name,
            max_name_length,
            last_selection: None,
            report: MatchReport::default(),
        }
    }

    /// Reads one line of player input without its line terminator.
    pub async fn read_line(&mut self) -> Result<String, ClientError> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .await
            .map_err(ClientError::Input)?;
        if n == 0 {
            return Err(ClientError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Returns the configured name, or prompts until the player enters a valid one.
    pub async fn player_name(&mut self) -> Result<String, ClientError> {
        if let Some(name) = self.preset_name.take() {
            return Ok(validate_name(&name, self.max_name_length)?);
        }
        loop {
            info!("Enter your name:");
            let input = self.read_line().await?;
            match validate_name(&input, self.max_name_length) {
                Ok(name) => return Ok(name),
                Err(ProtocolError::InvalidName(reason)) => warn!("Invalid name: {}", reason),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Prompts until the player types a valid selection.
    pub async fn read_selection(&mut self) -> Result<Selection, ClientError> {
        loop {
            info!("Please type the selection ('r', 'p', 's') and press enter");
            let input = self.read_line().await?;
            match input.parse::<Selection>() {
                Ok(selection) => return Ok(selection),
                Err(e) => warn!("{}", e),
            }
        }
    }

    pub async fn send(&mut self, message: &Message) -> Result<(), CodecError> {
        self.stream.send(message).await
    }

    pub async fn recv(&mut self) -> Result<Message, CodecError> {
        self.stream.recv().await
    }

    pub fn set_player_name(&mut self, name: String) {
        self.report.player_name = name;
    }

    pub fn set_opponent_name(&mut self, name: String) {
        self.report.opponent_name = Some(name);
    }

    pub fn set_last_selection(&mut self, selection: Selection) {
        self.last_selection = Some(selection);
    }

    pub fn record_round(&mut self, opponent_selection: Selection, outcome: Outcome) {
        self.report.rounds.push(RoundRecord {
            own_selection: self.last_selection.take(),
            opponent_selection,
            outcome,
        });
    }

    pub fn report(&self) -> &MatchReport {
        &self.report
    }

    pub fn into_report(self) -> MatchReport {
        self.report
    }
}
