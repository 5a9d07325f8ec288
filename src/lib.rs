//! RPS arena
//!
//! Two remote players compete in rock-paper-scissors rounds over a
//! persistent TCP connection. The server pairs joined players into sessions;
//! the client walks one player through a match.

pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod server;
pub mod utils;

pub use server::Server;
