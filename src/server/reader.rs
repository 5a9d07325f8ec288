//! Per-connection reader
//!
//! One task per accepted connection. It owns only the read half of its
//! stream, decodes incoming envelopes, and forwards them to the coordinator.
//! Any failure ends the task with a single `Leave` event.

use log::{debug, warn};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::handlers::log_connection_error;
use crate::protocol::{Message, read_message};
use crate::server::events::Event;
use crate::server::registry::ConnectionId;

/// Reads messages from `reader` until the connection fails or misbehaves.
pub async fn read_connection<R>(
    conn: ConnectionId,
    peer: String,
    mut reader: R,
    events: mpsc::Sender<Event>,
    max_frame_bytes: usize,
) where
    R: AsyncRead + Unpin,
{
    loop {
        let event = match read_message(&mut reader, max_frame_bytes).await {
            Ok(Message::Join(content)) => Event::Join { conn, content },
            Ok(Message::Select(content)) => Event::Select { conn, content },
            Ok(other) => {
                warn!(
                    "Connection {} ({}) sent unsupported message type {}",
                    conn,
                    peer,
                    other.message_type()
                );
                break;
            }
            Err(e) => {
                log_connection_error(&peer, &e);
                break;
            }
        };

        if events.send(event).await.is_err() {
            debug!("Coordinator gone, reader for {} stopping", conn);
            return;
        }
    }

    let _ = events.send(Event::Leave { conn }).await;
}

pub fn spawn_reader<R>(
    conn: ConnectionId,
    peer: String,
    reader: R,
    events: mpsc::Sender<Event>,
    max_frame_bytes: usize,
) -> JoinHandle<()>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    tokio::spawn(read_connection(conn, peer, reader, events, max_frame_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Selection;
    use crate::protocol::{DEFAULT_MAX_FRAME_BYTES, JoinContent, SelectContent, write_frame, write_message};
    use tokio::io::duplex;

    const CONN: ConnectionId = ConnectionId(1);

    #[tokio::test]
    async fn test_read_failure_leaves() {
        let (client, server) = duplex(256);
        drop(client);
        let (tx, mut rx) = mpsc::channel(4);
        read_connection(CONN, "test".into(), server, tx, DEFAULT_MAX_FRAME_BYTES).await;
        assert_eq!(rx.recv().await, Some(Event::Leave { conn: CONN }));
    }

    #[tokio::test]
    async fn test_join_then_select_forwarded() {
        let (mut client, server) = duplex(1024);
        let (tx, mut rx) = mpsc::channel(4);
        let task = spawn_reader(CONN, "test".into(), server, tx, DEFAULT_MAX_FRAME_BYTES);

        write_message(&mut client, &Message::join("donald")).await.unwrap();
        write_message(&mut client, &Message::select(Selection::Rock))
            .await
            .unwrap();
        drop(client);

        assert_eq!(
            rx.recv().await,
            Some(Event::Join {
                conn: CONN,
                content: JoinContent {
                    name: "donald".into()
                }
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(Event::Select {
                conn: CONN,
                content: SelectContent {
                    selection: Selection::Rock
                }
            })
        );
        assert_eq!(rx.recv().await, Some(Event::Leave { conn: CONN }));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_payload_leaves() {
        let (mut client, server) = duplex(1024);
        let (tx, mut rx) = mpsc::channel(4);
        let task = spawn_reader(CONN, "test".into(), server, tx, DEFAULT_MAX_FRAME_BYTES);

        write_frame(&mut client, br#"{"type":"SELECT","content":"non-json"}"#)
            .await
            .unwrap();

        assert_eq!(rx.recv().await, Some(Event::Leave { conn: CONN }));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_only_messages_leave() {
        for message in [
            Message::start("mickey"),
            Message::result(Selection::Rock, crate::game::Outcome::Win),
        ] {
            let (mut client, server) = duplex(1024);
            let (tx, mut rx) = mpsc::channel(4);
            let task = spawn_reader(CONN, "test".into(), server, tx, DEFAULT_MAX_FRAME_BYTES);

            write_message(&mut client, &message).await.unwrap();
            assert_eq!(rx.recv().await, Some(Event::Leave { conn: CONN }));
            task.await.unwrap();
        }
    }
}
