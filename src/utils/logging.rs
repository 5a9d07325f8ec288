//! Logging utilities
//!
//! Provides logging setup for the two binaries.

use env_logger::Env;

/// Setup logging for the server; `RUST_LOG` selects the level.
pub fn setup_server_logging() {
    env_logger::init();
}

/// Setup logging for the player client.
///
/// Prompts are logged at info level, so that is the default filter.
pub fn setup_client_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}
