//! Coordinator
//!
//! Single owner of every client and session record. The server loop feeds it
//! one event at a time, so no registry is ever shared or locked. Outbound
//! Start and Result messages are written inline while an event is handled.

use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fmt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::error::{CodecError, ProtocolError, SessionError};
use crate::protocol::{JoinContent, Message, MessageType, SelectContent};
use crate::server::events::Event;
use crate::server::matchmaker::Matchmaker;
use crate::server::reader::spawn_reader;
use crate::server::registry::{ClientEntry, ClientRegistry, ConnectionId, SessionId};
use crate::server::session::{RoundReport, Session};
use crate::utils::validation::validate_name;

pub struct Coordinator {
    clients: ClientRegistry,
    sessions: HashMap<SessionId, Session>,
    matchmaker: Matchmaker,
    events: mpsc::Sender<Event>,
    next_connection: u64,
    next_session: u64,
    max_frame_bytes: usize,
    max_name_length: usize,
}

impl Coordinator {
    /// Creates a coordinator together with the receiving end of its event channel.
    pub fn new(config: &ServerConfig) -> (Self, mpsc::Receiver<Event>) {
        let (events, receiver) = mpsc::channel(config.event_queue_capacity);
        let coordinator = Self {
            clients: ClientRegistry::new(),
            sessions: HashMap::new(),
            matchmaker: Matchmaker::new(),
            events,
            next_connection: 0,
            next_session: 0,
            max_frame_bytes: config.max_frame_bytes,
            max_name_length: config.max_name_length,
        };
        (coordinator, receiver)
    }

    /// Registers a freshly accepted connection and spawns its reader task.
    pub fn handle_accept<R, W>(&mut self, reader: R, writer: W, peer: String) -> ConnectionId
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        self.next_connection += 1;
        let conn = ConnectionId(self.next_connection);

        let mut client = ClientEntry::new(conn, peer.clone(), Box::new(writer));
        let task = spawn_reader(
            conn,
            peer.clone(),
            reader,
            self.events.clone(),
            self.max_frame_bytes,
        );
        client.set_reader_task(task.abort_handle());
        self.clients.insert(client);

        info!(
            "Connection {} from {} added (clients: {})",
            conn,
            peer,
            self.clients.len()
        );
        conn
    }

    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Join { conn, content } => self.handle_join(conn, content).await,
            Event::Select { conn, content } => self.handle_select(conn, content).await,
            Event::Leave { conn } => self.handle_leave(conn).await,
        }
    }

    /// Names the client and tries to pair it with the oldest waiting player.
    pub async fn handle_join(&mut self, conn: ConnectionId, content: JoinContent) {
        let Some(client) = self.clients.get(&conn) else {
            debug!("Join from unknown connection {} ignored", conn);
            return;
        };
        if client.is_joined() {
            self.reject(conn, ProtocolError::AlreadyJoined).await;
            return;
        }

        let name = match validate_name(&content.name, self.max_name_length) {
            Ok(name) => name,
            Err(e) => {
                self.reject(conn, e).await;
                return;
            }
        };
        info!("Connection {} joined (name: {})", conn, name);
        if let Some(client) = self.clients.get_mut(&conn) {
            client.set_name(name);
        }

        let Some(opponent) = self.matchmaker.find_opponent(conn, &self.clients) else {
            self.matchmaker.enqueue(conn);
            info!(
                "Connection {} waiting for an opponent (queue: {})",
                conn,
                self.matchmaker.len()
            );
            return;
        };

        match self.start_session(opponent, conn).await {
            Ok(session) => info!(
                "Session {} started (first: {} second: {})",
                session, opponent, conn
            ),
            Err(e) => {
                warn!(
                    "Failed to start session for {} and {}: {}",
                    opponent, conn, e
                );
                // A Start already delivered to `opponent` is not withdrawn; it
                // stays queued and its next pairing sends a fresh Start.
                self.matchmaker.requeue_front(opponent);
                self.matchmaker.enqueue(conn);
            }
        }
    }

    /// Sends Start to both players and attaches them to a new session.
    ///
    /// Nothing is attached unless both writes succeed.
    async fn start_session(
        &mut self,
        first: ConnectionId,
        second: ConnectionId,
    ) -> Result<SessionId, CodecError> {
        let first_name = self.joined_name(first)?;
        let second_name = self.joined_name(second)?;

        self.send_to(first, &Message::start(second_name)).await?;
        self.send_to(second, &Message::start(first_name)).await?;

        self.next_session += 1;
        let id = SessionId(self.next_session);
        for conn in [first, second] {
            if let Some(client) = self.clients.get_mut(&conn) {
                client.set_session(Some(id));
            }
        }
        self.sessions.insert(id, Session::new(id, first, second));
        Ok(id)
    }

    /// Forwards a selection to the client's session and reports a finished round.
    pub async fn handle_select(&mut self, conn: ConnectionId, content: SelectContent) {
        let Some(client) = self.clients.get(&conn) else {
            debug!("Selection from unknown connection {} ignored", conn);
            return;
        };
        if !client.is_joined() {
            self.reject(conn, ProtocolError::NotJoined).await;
            return;
        }
        let Some(session_id) = client.session() else {
            self.reject(conn, ProtocolError::NoActiveSession).await;
            return;
        };
        let Some(session) = self.sessions.get_mut(&session_id) else {
            error!("{} points at missing session {}", conn, session_id);
            self.reject(conn, ProtocolError::NoActiveSession).await;
            return;
        };

        debug!(
            "Connection {} selection received (selection: {})",
            conn, content.selection
        );
        match session.select(conn, content.selection) {
            Ok(None) => {}
            Ok(Some(report)) => self.report_round(session_id, report).await,
            Err(SessionError::Concluded) => {
                self.reject(
                    conn,
                    ProtocolError::UnexpectedMessage {
                        expected: "no further messages",
                        received: MessageType::Select,
                    },
                )
                .await
            }
            Err(e) => {
                error!("Session {} refused selection from {}: {}", session_id, conn, e);
                self.reject(conn, ProtocolError::NoActiveSession).await;
            }
        }
    }

    async fn report_round(&mut self, session: SessionId, report: RoundReport) {
        let deliveries = [
            (report.first, report.message_for_first()),
            (report.second, report.message_for_second()),
        ];
        for (conn, message) in deliveries {
            if let Err(e) = self.send_to(conn, &message).await {
                warn!("Failed to write RESULT message for {}: {}", conn, e);
                self.close_session(session).await;
                return;
            }
        }
        info!(
            "Session {} round result {}:{} and {}:{}",
            session,
            report.first,
            report.outcome,
            report.second,
            report.outcome.inverse()
        );
    }

    /// Removes the client; a session it held is closed together with the peer's connection.
    pub async fn handle_leave(&mut self, conn: ConnectionId) {
        let Some(client) = self.clients.remove(&conn) else {
            debug!("Leave for already removed connection {}", conn);
            return;
        };
        self.matchmaker.remove(conn);
        let session = client.session();
        let peer = client.peer().to_string();
        client.close().await;

        if let Some(session) = session {
            self.close_session(session).await;
        }
        info!(
            "Connection {} from {} removed (clients: {})",
            conn,
            peer,
            self.clients.len()
        );
    }

    /// Destroys the session and closes both of its connections.
    async fn close_session(&mut self, id: SessionId) {
        let Some(session) = self.sessions.remove(&id) else {
            return;
        };
        for conn in session.participants() {
            self.matchmaker.remove(conn);
            if let Some(client) = self.clients.remove(&conn) {
                client.close().await;
            }
        }
        let [first, second] = session.participants();
        info!(
            "Session {} closed after {} round(s) (first: {} second: {} concluded: {})",
            session.id(),
            session.rounds_played(),
            first,
            second,
            session.is_concluded()
        );
    }

    /// Tears a connection down without replying.
    async fn reject(&mut self, conn: ConnectionId, reason: impl fmt::Display) {
        warn!("Closing connection {}: {}", conn, reason);
        self.handle_leave(conn).await;
    }

    async fn send_to(&mut self, conn: ConnectionId, message: &Message) -> Result<(), CodecError> {
        match self.clients.get_mut(&conn) {
            Some(client) => client.send(message).await,
            None => Err(CodecError::ConnectionClosed),
        }
    }

    fn joined_name(&self, conn: ConnectionId) -> Result<String, CodecError> {
        self.clients
            .get(&conn)
            .and_then(|client| client.name())
            .map(str::to_string)
            .ok_or(CodecError::ConnectionClosed)
    }

    /// Drops every connection at once; no one is notified.
    pub fn shutdown(&mut self) {
        if !self.clients.is_empty() {
            info!(
                "Dropping {} connection(s) and {} session(s)",
                self.clients.len(),
                self.sessions.len()
            );
        }
        if !self.matchmaker.is_empty() {
            debug!("{} player(s) still waiting for an opponent", self.matchmaker.len());
        }
        self.matchmaker = Matchmaker::new();
        self.sessions.clear();
        for client in self.clients.drain() {
            client.abort();
        }
    }

    #[cfg(test)]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn waiting_count(&self) -> usize {
        self.matchmaker.len()
    }

    #[cfg(test)]
    pub fn has_client(&self, conn: ConnectionId) -> bool {
        self.clients.contains(&conn)
    }

    #[cfg(test)]
    pub fn session_of(&self, conn: ConnectionId) -> Option<&Session> {
        let id = self.clients.get(&conn)?.session()?;
        self.sessions.get(&id)
    }
}
