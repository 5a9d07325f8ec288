//! Module `codec`
//!
//! Length-prefixed framing on top of any async byte stream.
//!
//! Every frame is a 4-byte big-endian body length followed by the encoded
//! envelope, so one message never depends on how the transport splits or
//! coalesces writes.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CodecError;
use crate::protocol::messages::Message;
use crate::protocol::parser::{decode_message, encode_message};

pub const DEFAULT_MAX_FRAME_BYTES: usize = 4096;
const LENGTH_PREFIX_BYTES: usize = 4;

/// Reads one frame body.
///
/// A stream that ends before the first prefix byte yields
/// [`CodecError::ConnectionClosed`]; one that ends later yields
/// [`CodecError::TruncatedFrame`].
pub async fn read_frame<R>(reader: &mut R, max_frame_bytes: usize) -> Result<Vec<u8>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    let mut filled = 0;
    while filled < LENGTH_PREFIX_BYTES {
        let n = reader.read(&mut prefix[filled..]).await?;
        if n == 0 {
            return Err(if filled == 0 {
                CodecError::ConnectionClosed
            } else {
                CodecError::TruncatedFrame
            });
        }
        filled += n;
    }

    let size = u32::from_be_bytes(prefix) as usize;
    if size > max_frame_bytes {
        return Err(CodecError::FrameTooLarge {
            size,
            max: max_frame_bytes,
        });
    }

    let mut body = vec![0u8; size];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

/// Writes one frame and flushes it.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let size = u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge {
        size: body.len(),
        max: u32::MAX as usize,
    })?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + body.len());
    frame.extend_from_slice(&size.to_be_bytes());
    frame.extend_from_slice(body);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_message<R>(reader: &mut R, max_frame_bytes: usize) -> Result<Message, CodecError>
where
    R: AsyncRead + Unpin,
{
    let body = read_frame(reader, max_frame_bytes).await?;
    decode_message(&body)
}

pub async fn write_message<W>(writer: &mut W, message: &Message) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let body = encode_message(message)?;
    write_frame(writer, &body).await
}

/// A byte stream that sends and receives whole messages.
pub struct MessageStream<S> {
    stream: S,
    max_frame_bytes: usize,
}

impl<S> MessageStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, max_frame_bytes: usize) -> Self {
        Self {
            stream,
            max_frame_bytes,
        }
    }

    pub async fn send(&mut self, message: &Message) -> Result<(), CodecError> {
        write_message(&mut self.stream, message).await
    }

    pub async fn recv(&mut self) -> Result<Message, CodecError> {
        read_message(&mut self.stream, self.max_frame_bytes).await
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}
