//! Module `state`
//!
//! The player's side of the conversation as a closed set of states.
//!
//! | State     | Trigger                  | Next      |
//! |-----------|--------------------------|-----------|
//! | Connected | JoinSent                 | Joined    |
//! | Joined    | StartReceived            | Started   |
//! | Started   | SelectSent               | Waiting   |
//! | Waiting   | DrawReceived             | Started   |
//! | Waiting   | DecisiveResultReceived   | End       |
//!
//! `End` is terminal. Every other pairing is rejected by [`ClientState::transition`].

use log::info;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};

use crate::client::context::Context;
use crate::client::results::MatchReport;
use crate::error::{ClientError, ProtocolError};
use crate::protocol::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Connection open, Join not sent yet.
    Connected,
    /// Join sent, waiting for an opponent.
    Joined,
    /// Session running, the player has to pick.
    Started,
    /// Selection sent, waiting for the round result.
    Waiting,
    End,
}

/// What a state's work produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    JoinSent,
    StartReceived,
    SelectSent,
    DrawReceived,
    DecisiveResultReceived,
}

impl ClientState {
    pub fn is_terminal(self) -> bool {
        self == ClientState::End
    }

    /// Looks up the next state; `None` for pairings outside the table.
    pub fn transition(self, trigger: Trigger) -> Option<ClientState> {
        match (self, trigger) {
            (ClientState::Connected, Trigger::JoinSent) => Some(ClientState::Joined),
            (ClientState::Joined, Trigger::StartReceived) => Some(ClientState::Started),
            (ClientState::Started, Trigger::SelectSent) => Some(ClientState::Waiting),
            (ClientState::Waiting, Trigger::DrawReceived) => Some(ClientState::Started),
            (ClientState::Waiting, Trigger::DecisiveResultReceived) => Some(ClientState::End),
            _ => None,
        }
    }

    /// Performs the state's I/O and reports what happened.
    pub async fn step<I, S>(self, ctx: &mut Context<I, S>) -> Result<Trigger, ClientError>
    where
        I: AsyncBufRead + Unpin,
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            ClientState::Connected => connected(ctx).await,
            ClientState::Joined => joined(ctx).await,
            ClientState::Started => started(ctx).await,
            ClientState::Waiting => waiting(ctx).await,
            ClientState::End => Err(ClientError::InvalidTransition {
                state: self,
                trigger: None,
            }),
        }
    }
}

/// Drives the state machine from `initial` until it reaches `End`.
pub async fn run<I, S>(
    ctx: &mut Context<I, S>,
    initial: ClientState,
) -> Result<MatchReport, ClientError>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut state = initial;
    while !state.is_terminal() {
        let trigger = state.step(ctx).await?;
        state = state
            .transition(trigger)
            .ok_or(ClientError::InvalidTransition {
                state,
                trigger: Some(trigger),
            })?;
    }
    Ok(ctx.report().clone())
}

async fn connected<I, S>(ctx: &mut Context<I, S>) -> Result<Trigger, ClientError>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let name = ctx.player_name().await?;
    ctx.send(&Message::join(name.clone())).await?;
    info!("Joined the game as {:?}.", name);
    ctx.set_player_name(name);
    Ok(Trigger::JoinSent)
}

async fn joined<I, S>(ctx: &mut Context<I, S>) -> Result<Trigger, ClientError>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("Waiting for an opponent. Please wait...");
    match ctx.recv().await? {
        Message::Start(content) => {
            info!("Opponent {:?} joined the game.", content.opponent_name);
            ctx.set_opponent_name(content.opponent_name);
            Ok(Trigger::StartReceived)
        }
        other => Err(ProtocolError::UnexpectedMessage {
            expected: "START",
            received: other.message_type(),
        }
        .into()),
    }
}

async fn started<I, S>(ctx: &mut Context<I, S>) -> Result<Trigger, ClientError>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let selection = ctx.read_selection().await?;
    ctx.send(&Message::select(selection)).await?;
    ctx.set_last_selection(selection);
    Ok(Trigger::SelectSent)
}

async fn waiting<I, S>(ctx: &mut Context<I, S>) -> Result<Trigger, ClientError>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("Waiting for game result. Please wait...");
    match ctx.recv().await? {
        Message::Result(content) => {
            ctx.record_round(content.opponent_selection, content.result);
            info!(
                "Opponent picked {}, you {}.",
                content.opponent_selection, content.result
            );
            if content.result.is_draw() {
                info!("Round ended in a draw. Let's have another round...");
                Ok(Trigger::DrawReceived)
            } else {
                Ok(Trigger::DecisiveResultReceived)
            }
        }
        other => Err(ProtocolError::UnexpectedMessage {
            expected: "RESULT",
            received: other.message_type(),
        }
        .into()),
    }
}
