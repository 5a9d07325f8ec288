//! Input validation utilities
//!
//! Checks shared by the server (for incoming Join messages) and the client
//! (for names typed by the player).

use crate::error::ProtocolError;

/// Trims a player name and checks it against the length limit.
///
/// Line breaks and NUL are refused so a name always prints on one line.
pub fn validate_name(raw: &str, max_length: usize) -> Result<String, ProtocolError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ProtocolError::InvalidName("name is empty".into()));
    }
    if name.contains(['\r', '\n', '\0']) {
        return Err(ProtocolError::InvalidName(
            "name contains control characters".into(),
        ));
    }
    let length = name.chars().count();
    if length > max_length {
        return Err(ProtocolError::InvalidName(format!(
            "name has {} characters, at most {} allowed",
            length, max_length
        )));
    }
    Ok(name.to_string())
}
