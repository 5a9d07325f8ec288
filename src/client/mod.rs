//! Player client
//!
//! Connects to a server and walks through the protocol states until the
//! match has a decisive result.

pub mod context;
pub mod handler;
pub mod results;
pub mod state;

pub use context::Context;
pub use handler::play;
pub use results::{MatchReport, RoundRecord};
pub use state::{ClientState, Trigger, run};
