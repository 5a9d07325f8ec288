//! Client result types
//!
//! What a finished match looked like from the player's side.

use crate::game::{Outcome, Selection};

/// One resolved round as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub own_selection: Option<Selection>,
    pub opponent_selection: Selection,
    pub outcome: Outcome,
}

/// Summary returned once the protocol reaches its end state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub player_name: String,
    pub opponent_name: Option<String>,
    pub rounds: Vec<RoundRecord>,
}

impl MatchReport {
    /// Outcome of the last round, which ends the match unless it was a draw.
    pub fn final_outcome(&self) -> Option<Outcome> {
        self.rounds.last().map(|round| round.outcome)
    }

    pub fn draws(&self) -> usize {
        self.rounds
            .iter()
            .filter(|round| round.outcome.is_draw())
            .count()
    }
}
