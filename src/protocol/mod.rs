//! Wire protocol
//!
//! Message envelopes, payload encoding, and stream framing shared by the
//! server and the player client.

pub mod codec;
pub mod messages;
pub mod parser;

pub use codec::{
    DEFAULT_MAX_FRAME_BYTES, MessageStream, read_frame, read_message, write_frame, write_message,
};
pub use messages::{
    Envelope, JoinContent, Message, MessageType, ResultContent, SelectContent, StartContent,
};
pub use parser::{decode_message, encode_message};
