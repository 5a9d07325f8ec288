//! Client registry
//!
//! Tracks every accepted connection from accept to disconnect. Owned by the
//! coordinator; nothing else holds a reference into it.

use log::debug;
use std::collections::HashMap;
use std::fmt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::task::AbortHandle;

use crate::error::CodecError;
use crate::protocol::{Message, write_message};

/// Registry key for one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Write side of a connection as seen by the coordinator.
pub type Outbound = Box<dyn AsyncWrite + Send + Unpin>;

/// Server-side state of one connected player.
pub struct ClientEntry {
    id: ConnectionId,
    peer: String,
    name: Option<String>,
    session: Option<SessionId>,
    writer: Outbound,
    reader_task: Option<AbortHandle>,
}

impl ClientEntry {
    pub fn new(id: ConnectionId, peer: String, writer: Outbound) -> Self {
        Self {
            id,
            peer,
            name: None,
            session: None,
            writer,
            reader_task: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Returns the player name once the connection has joined.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn is_joined(&self) -> bool {
        self.name.is_some()
    }

    /// Joined and not attached to any session.
    pub fn is_waiting(&self) -> bool {
        self.is_joined() && self.session.is_none()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub fn set_session(&mut self, session: Option<SessionId>) {
        self.session = session;
    }

    pub fn set_reader_task(&mut self, handle: AbortHandle) {
        self.reader_task = Some(handle);
    }

    /// Writes one message, waiting until it has been flushed.
    pub async fn send(&mut self, message: &Message) -> Result<(), CodecError> {
        write_message(&mut self.writer, message).await
    }

    /// Stops the connection's reader and closes the write side so the peer observes EOF.
    pub async fn close(mut self) {
        if let Some(handle) = self.reader_task.take() {
            handle.abort();
        }
        if let Err(e) = self.writer.shutdown().await {
            debug!("Shutdown of {} ({}) failed: {}", self.id, self.peer, e);
        }
    }

    /// Closes without flushing or waiting.
    pub fn abort(mut self) {
        if let Some(handle) = self.reader_task.take() {
            handle.abort();
        }
    }
}

impl fmt::Display for ClientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "client({}:{})", self.id, name),
            None => write!(f, "client({})", self.id),
        }
    }
}

/// Registry for tracking connected clients
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<ConnectionId, ClientEntry>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: ClientEntry) {
        self.clients.insert(client.id(), client);
    }

    pub fn remove(&mut self, id: &ConnectionId) -> Option<ClientEntry> {
        self.clients.remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&ClientEntry> {
        self.clients.get(id)
    }

    pub fn get_mut(&mut self, id: &ConnectionId) -> Option<&mut ClientEntry> {
        self.clients.get_mut(id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.clients.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether the connection is joined and free to be paired.
    pub fn is_waiting(&self, id: &ConnectionId) -> bool {
        self.clients.get(id).is_some_and(ClientEntry::is_waiting)
    }

    /// Removes every client at once.
    pub fn drain(&mut self) -> impl Iterator<Item = ClientEntry> + '_ {
        self.clients.drain().map(|(_, client)| client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64) -> ClientEntry {
        ClientEntry::new(ConnectionId(id), "test".into(), Box::new(tokio::io::sink()))
    }

    #[test]
    fn test_new_client_is_not_joined() {
        let client = entry(1);
        assert!(!client.is_joined());
        assert!(!client.is_waiting());
        assert!(client.session().is_none());
        assert_eq!(client.to_string(), "client(conn#1)");
    }

    #[test]
    fn test_waiting_requires_name_and_no_session() {
        let mut registry = ClientRegistry::new();
        let mut client = entry(1);
        client.set_name("donald".into());
        registry.insert(client);
        assert!(registry.is_waiting(&ConnectionId(1)));

        registry
            .get_mut(&ConnectionId(1))
            .unwrap()
            .set_session(Some(SessionId(7)));
        assert!(!registry.is_waiting(&ConnectionId(1)));
        assert!(!registry.is_waiting(&ConnectionId(2)));
    }

    #[tokio::test]
    async fn test_send_writes_frame() {
        let (server_side, mut client_side) = tokio::io::duplex(256);
        let mut client = ClientEntry::new(ConnectionId(3), "test".into(), Box::new(server_side));
        client.send(&Message::start("mickey")).await.unwrap();

        let message = crate::protocol::read_message(&mut client_side, 256)
            .await
            .unwrap();
        assert_eq!(message, Message::start("mickey"));
    }
}
