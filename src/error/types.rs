//! Error types
//!
//! Defines domain-specific error types for each layer of the game: the wire
//! codec, the protocol phases, sessions, and the player client.

use std::fmt;
use std::io;

use crate::client::{ClientState, Trigger};
use crate::protocol::MessageType;

/// Wire codec errors
#[derive(Debug)]
pub enum CodecError {
    /// The peer closed the stream cleanly before a new frame began.
    ConnectionClosed,
    /// The stream ended in the middle of a frame.
    TruncatedFrame,
    FrameTooLarge { size: usize, max: usize },
    MalformedEnvelope(serde_json::Error),
    MalformedPayload {
        message_type: MessageType,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::ConnectionClosed => write!(f, "Connection closed by peer"),
            CodecError::TruncatedFrame => write!(f, "Connection closed in the middle of a frame"),
            CodecError::FrameTooLarge { size, max } => {
                write!(f, "Frame of {} bytes exceeds the limit of {} bytes", size, max)
            }
            CodecError::MalformedEnvelope(e) => write!(f, "Malformed envelope: {}", e),
            CodecError::MalformedPayload {
                message_type,
                source,
            } => write!(f, "Malformed {} payload: {}", message_type, source),
            CodecError::Encode(e) => write!(f, "Failed to encode message: {}", e),
            CodecError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::MalformedEnvelope(e) | CodecError::Encode(e) => Some(e),
            CodecError::MalformedPayload { source, .. } => Some(source),
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::TruncatedFrame,
            _ => CodecError::Io(error),
        }
    }
}

/// Protocol phase errors
#[derive(Debug, PartialEq)]
pub enum ProtocolError {
    /// A message type that is not valid in the current phase of the conversation.
    UnexpectedMessage {
        expected: &'static str,
        received: MessageType,
    },
    InvalidName(String),
    NotJoined,
    AlreadyJoined,
    NoActiveSession,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnexpectedMessage { expected, received } => {
                write!(f, "Expected {} but received {}", expected, received)
            }
            ProtocolError::InvalidName(reason) => write!(f, "Invalid player name: {}", reason),
            ProtocolError::NotJoined => write!(f, "Connection has not joined yet"),
            ProtocolError::AlreadyJoined => write!(f, "Connection has already joined"),
            ProtocolError::NoActiveSession => write!(f, "Connection has no active session"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Session module errors
#[derive(Debug, PartialEq)]
pub enum SessionError {
    NotAParticipant,
    /// The decisive round has been played; the session accepts no more selections.
    Concluded,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotAParticipant => write!(f, "Connection is not part of this session"),
            SessionError::Concluded => write!(f, "Session already reached a decisive result"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Player client errors
#[derive(Debug)]
pub enum ClientError {
    Connect { address: String, source: io::Error },
    /// Standard input ended before the player answered the prompt.
    InputClosed,
    Input(io::Error),
    Codec(CodecError),
    Protocol(ProtocolError),
    /// The state machine produced a trigger its current state does not accept.
    InvalidTransition {
        state: ClientState,
        trigger: Option<Trigger>,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connect { address, source } => {
                write!(f, "Failed to connect to {}: {}", address, source)
            }
            ClientError::InputClosed => write!(f, "User input closed"),
            ClientError::Input(e) => write!(f, "Failed to read user input: {}", e),
            ClientError::Codec(e) => write!(f, "Connection error: {}", e),
            ClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ClientError::InvalidTransition { state, trigger } => match trigger {
                Some(trigger) => write!(f, "No transition from {:?} on {:?}", state, trigger),
                None => write!(f, "State {:?} has no work to do", state),
            },
        }
    }
}

impl std::error::Error for ClientError {}

impl From<CodecError> for ClientError {
    fn from(error: CodecError) -> Self {
        ClientError::Codec(error)
    }
}

impl From<ProtocolError> for ClientError {
    fn from(error: ProtocolError) -> Self {
        ClientError::Protocol(error)
    }
}

/// General error that encompasses all error types
#[derive(Debug)]
pub enum RpsError {
    Config(config::ConfigError),
    Client(ClientError),
    Io(io::Error),
}

impl fmt::Display for RpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpsError::Config(e) => write!(f, "Configuration error: {}", e),
            RpsError::Client(e) => write!(f, "Client error: {}", e),
            RpsError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RpsError {}

impl From<config::ConfigError> for RpsError {
    fn from(error: config::ConfigError) -> Self {
        RpsError::Config(error)
    }
}

impl From<ClientError> for RpsError {
    fn from(error: ClientError) -> Self {
        RpsError::Client(error)
    }
}

impl From<io::Error> for RpsError {
    fn from(error: io::Error) -> Self {
        RpsError::Io(error)
    }
}
