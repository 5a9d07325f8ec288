//! Error handlers
//!
//! Classifies errors at the process and connection boundaries.

use crate::error::types::{ClientError, CodecError, RpsError};
use log::{error, info};

/// Log an error that reached the process boundary
pub fn handle_error(err: &RpsError) {
    error!("RPS error: {}", err);
}

/// Convert error to a process exit status
pub fn error_to_exit_code(err: &RpsError) -> u8 {
    match err {
        RpsError::Config(_) => 2,
        RpsError::Client(_) | RpsError::Io(_) => 1,
    }
}

/// Whether a codec error only means the peer went away.
pub fn is_disconnect(err: &CodecError) -> bool {
    match err {
        CodecError::ConnectionClosed | CodecError::TruncatedFrame => true,
        CodecError::Io(e) => matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
        ),
        _ => false,
    }
}

/// Log a reader-side failure at a level matching its severity.
pub fn log_connection_error(peer: &str, err: &CodecError) {
    if is_disconnect(err) {
        info!("Connection {} closed: {}", peer, err);
    } else {
        error!("Connection {} failed: {}", peer, err);
    }
}

/// Whether a client error is a lost connection rather than a misbehaving peer.
pub fn is_client_disconnect(err: &ClientError) -> bool {
    matches!(err, ClientError::Codec(e) if is_disconnect(e))
}
