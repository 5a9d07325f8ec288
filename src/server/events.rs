//! Coordinator events
//!
//! Everything a connection reader can tell the coordinator.

use crate::protocol::{JoinContent, SelectContent};
use crate::server::registry::ConnectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Join {
        conn: ConnectionId,
        content: JoinContent,
    },
    Select {
        conn: ConnectionId,
        content: SelectContent,
    },
    /// The connection is gone: closed, failed, or sent something unreadable.
    Leave { conn: ConnectionId },
}
