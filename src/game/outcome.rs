//! Module `outcome`
//!
//! Round results from one player's point of view.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    /// The same result seen from the opponent's side.
    pub fn inverse(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }

    pub fn is_draw(self) -> bool {
        self == Outcome::Draw
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Draw => "draw",
        };
        f.write_str(text)
    }
}

/// Resolves `own` against `opponent` from the first player's point of view.
pub fn resolve(own: Selection, opponent: Selection) -> Outcome {
    if own == opponent {
        Outcome::Draw
    } else if own.beats(opponent) {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_selections_draw() {
        for selection in Selection::ALL {
            assert_eq!(resolve(selection, selection), Outcome::Draw);
        }
    }

    #[test]
    fn test_resolve_is_antisymmetric() {
        for a in Selection::ALL {
            for b in Selection::ALL {
                let forward = resolve(a, b);
                let backward = resolve(b, a);
                assert_eq!(forward == Outcome::Win, backward == Outcome::Lose);
                assert_eq!(forward.inverse(), backward);
            }
        }
    }

    #[test]
    fn test_decisive_pairs() {
        assert_eq!(resolve(Selection::Rock, Selection::Paper), Outcome::Lose);
        assert_eq!(resolve(Selection::Paper, Selection::Rock), Outcome::Win);
        assert_eq!(resolve(Selection::Scissors, Selection::Rock), Outcome::Lose);
        assert_eq!(resolve(Selection::Scissors, Selection::Paper), Outcome::Win);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"WIN\"");
        assert_eq!(serde_json::to_string(&Outcome::Lose).unwrap(), "\"LOSE\"");
        assert_eq!(
            serde_json::from_str::<Outcome>("\"DRAW\"").unwrap(),
            Outcome::Draw
        );
    }
}
