//! Module `selection`
//!
//! Defines the three hand shapes a player can pick and how they compare.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A player's pick for one round.
///
/// On the wire each shape is encoded as its initial letter (`"r"`, `"p"`, `"s"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    #[serde(rename = "r")]
    Rock,
    #[serde(rename = "p")]
    Paper,
    #[serde(rename = "s")]
    Scissors,
}

impl Selection {
    #[cfg(test)]
    pub const ALL: [Selection; 3] = [Selection::Rock, Selection::Paper, Selection::Scissors];

    /// Returns true when this selection defeats `other`.
    pub fn beats(self, other: Selection) -> bool {
        matches!(
            (self, other),
            (Selection::Rock, Selection::Scissors)
                | (Selection::Scissors, Selection::Paper)
                | (Selection::Paper, Selection::Rock)
        )
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selection::Rock => "rock",
            Selection::Paper => "paper",
            Selection::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Input that does not name one of the three shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSelection(pub String);

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} is not a valid selection (expected 'r', 'p' or 's')",
            self.0
        )
    }
}

impl std::error::Error for InvalidSelection {}

impl FromStr for Selection {
    type Err = InvalidSelection;

    /// Accepts the wire tokens as well as the full, case-insensitive names.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Ok(Selection::Rock),
            "p" | "paper" => Ok(Selection::Paper),
            "s" | "scissors" => Ok(Selection::Scissors),
            _ => Err(InvalidSelection(input.trim().to_string())),
        }
    }
}
