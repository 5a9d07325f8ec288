//! Envelope parsing
//!
//! Two-step decoding: the envelope first, then a payload decode directed by
//! the envelope's type tag. Encoding mirrors it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;
use crate::protocol::messages::{Envelope, Message, MessageType};

/// Decodes one frame body into a typed message.
pub fn decode_message(bytes: &[u8]) -> Result<Message, CodecError> {
    let envelope: Envelope =
        serde_json::from_slice(bytes).map_err(CodecError::MalformedEnvelope)?;
    decode_content(envelope)
}

/// Decodes the embedded payload of an already parsed envelope.
pub fn decode_content(envelope: Envelope) -> Result<Message, CodecError> {
    let message_type = envelope.message_type;
    let content = envelope.content;
    let message = match message_type {
        MessageType::Join => Message::Join(payload(message_type, content)?),
        MessageType::Start => Message::Start(payload(message_type, content)?),
        MessageType::Select => Message::Select(payload(message_type, content)?),
        MessageType::Result => Message::Result(payload(message_type, content)?),
    };
    Ok(message)
}

fn payload<T: DeserializeOwned>(
    message_type: MessageType,
    content: serde_json::Value,
) -> Result<T, CodecError> {
    serde_json::from_value(content).map_err(|source| CodecError::MalformedPayload {
        message_type,
        source,
    })
}

/// Encodes a message into one frame body.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, CodecError> {
    let content = match message {
        Message::Join(content) => to_value(content)?,
        Message::Start(content) => to_value(content)?,
        Message::Select(content) => to_value(content)?,
        Message::Result(content) => to_value(content)?,
    };
    let envelope = Envelope {
        message_type: message.message_type(),
        content,
    };
    serde_json::to_vec(&envelope).map_err(CodecError::Encode)
}

fn to_value<T: Serialize>(content: &T) -> Result<serde_json::Value, CodecError> {
    serde_json::to_value(content).map_err(CodecError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Outcome, Selection};
    use crate::protocol::messages::{JoinContent, SelectContent};

    #[test]
    fn test_decode_join() {
        let data = br#"{"type":"JOIN","content":{"name":"donald"}}"#;
        let message = decode_message(data).unwrap();
        assert_eq!(
            message,
            Message::Join(JoinContent {
                name: "donald".into()
            })
        );
    }

    #[test]
    fn test_decode_select() {
        let data = br#"{"type":"SELECT","content":{"selection":"r"}}"#;
        let message = decode_message(data).unwrap();
        assert_eq!(
            message,
            Message::Select(SelectContent {
                selection: Selection::Rock
            })
        );
    }

    #[test]
    fn test_payload_kinds_survive_encoding() {
        let messages = [
            Message::join("donald"),
            Message::start("mickey"),
            Message::select(Selection::Scissors),
            Message::result(Selection::Paper, Outcome::Lose),
        ];
        for message in messages {
            let bytes = encode_message(&message).unwrap();
            assert_eq!(decode_message(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn test_encoded_field_names() {
        let bytes = encode_message(&Message::result(Selection::Rock, Outcome::Win)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "RESULT");
        assert_eq!(json["content"]["opponentSelection"], "r");
        assert_eq!(json["content"]["result"], "WIN");

        let bytes = encode_message(&Message::start("mickey")).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "START");
        assert_eq!(json["content"]["opponentName"], "mickey");
    }

    #[test]
    fn test_malformed_envelope() {
        assert!(matches!(
            decode_message(b"not json"),
            Err(CodecError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            decode_message(br#"{"type":"QUIT","content":{}}"#),
            Err(CodecError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let data = br#"{"type":"JOIN","content":"non-json"}"#;
        match decode_message(data) {
            Err(CodecError::MalformedPayload { message_type, .. }) => {
                assert_eq!(message_type, MessageType::Join)
            }
            other => panic!("unexpected decode result: {:?}", other),
        }

        let data = br#"{"type":"SELECT","content":{"selection":"x"}}"#;
        assert!(matches!(
            decode_message(data),
            Err(CodecError::MalformedPayload {
                message_type: MessageType::Select,
                ..
            })
        ));
    }
}
