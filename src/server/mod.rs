//! Game server
//!
//! The listening loop, the coordinator that owns all client and session
//! state, and the pieces it drives: connection readers, the matchmaker, and
//! sessions.

pub mod coordinator;
pub mod core;
pub mod events;
pub mod matchmaker;
pub mod reader;
pub mod registry;
pub mod session;

pub use coordinator::Coordinator;
pub use self::core::Server;
pub use events::Event;
pub use registry::{ConnectionId, SessionId};
pub use session::{Round, Session};
