//! Matchmaker
//!
//! FIFO queue of joined players waiting for an opponent. Pairing always
//! takes the oldest eligible entry.

use std::collections::VecDeque;

use crate::server::registry::{ClientRegistry, ConnectionId};

#[derive(Debug, Default)]
pub struct Matchmaker {
    queue: VecDeque<ConnectionId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest queued connection that can still be paired with `joining`.
    ///
    /// Entries that have left, already hold a session, or are `joining`
    /// itself are dropped from the queue on the way.
    pub fn find_opponent(
        &mut self,
        joining: ConnectionId,
        clients: &ClientRegistry,
    ) -> Option<ConnectionId> {
        while let Some(candidate) = self.queue.pop_front() {
            if candidate != joining && clients.is_waiting(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    pub fn enqueue(&mut self, conn: ConnectionId) {
        if !self.queue.contains(&conn) {
            self.queue.push_back(conn);
        }
    }

    /// Puts a connection back at the head of the queue after a failed pairing.
    pub fn requeue_front(&mut self, conn: ConnectionId) {
        if !self.queue.contains(&conn) {
            self.queue.push_front(conn);
        }
    }

    pub fn remove(&mut self, conn: ConnectionId) {
        self.queue.retain(|queued| *queued != conn);
    }

    #[cfg(test)]
    pub fn is_queued(&self, conn: ConnectionId) -> bool {
        self.queue.contains(&conn)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
