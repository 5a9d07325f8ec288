//! Error handling
//!
//! Defines error types and handling for the game server and client.

pub mod handlers;
pub mod types;

pub use types::*;
