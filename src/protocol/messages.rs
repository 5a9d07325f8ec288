//! Module `messages`
//!
//! Defines the envelope exchanged between client and server and the four
//! payloads it can carry.
//!
//! An envelope is a JSON object with a `type` tag and an embedded `content`
//! document. The content is decoded in a second step once the tag is known,
//! see [`crate::protocol::parser`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Outcome, Selection};

/// Type tag carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Join,
    Start,
    Select,
    Result,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MessageType::Join => "JOIN",
            MessageType::Start => "START",
            MessageType::Select => "SELECT",
            MessageType::Result => "RESULT",
        };
        f.write_str(tag)
    }
}

/// Client to server: announces the player's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinContent {
    pub name: String,
}

/// Server to client: a session has started against the named opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartContent {
    pub opponent_name: String,
}

/// Client to server: the player's pick for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectContent {
    pub selection: Selection,
}

/// Server to client: how the round ended for the receiving player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultContent {
    pub opponent_selection: Selection,
    pub result: Outcome,
}

/// Outer wrapper as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: serde_json::Value,
}

/// A fully decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Join(JoinContent),
    Start(StartContent),
    Select(SelectContent),
    Result(ResultContent),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Join(_) => MessageType::Join,
            Message::Start(_) => MessageType::Start,
            Message::Select(_) => MessageType::Select,
            Message::Result(_) => MessageType::Result,
        }
    }

    pub fn join(name: impl Into<String>) -> Self {
        Message::Join(JoinContent { name: name.into() })
    }

    pub fn start(opponent_name: impl Into<String>) -> Self {
        Message::Start(StartContent {
            opponent_name: opponent_name.into(),
        })
    }

    pub fn select(selection: Selection) -> Self {
        Message::Select(SelectContent { selection })
    }

    pub fn result(opponent_selection: Selection, result: Outcome) -> Self {
        Message::Result(ResultContent {
            opponent_selection,
            result,
        })
    }
}
