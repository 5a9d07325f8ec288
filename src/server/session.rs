//! Sessions and rounds
//!
//! A session pairs two connections and owns the round currently being
//! played. It only computes state transitions and the messages they produce;
//! the coordinator performs the writes.

use crate::error::SessionError;
use crate::game::{Outcome, Selection, resolve};
use crate::protocol::Message;
use crate::server::registry::{ConnectionId, SessionId};

/// Which of the two session slots a connection occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// The pending selections of one round.
///
/// Empty while neither player has picked, partial with one pick, and ended
/// once both slots are filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    first: Option<Selection>,
    second: Option<Selection>,
}

impl Round {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a selection; a repeated pick from the same side overwrites the previous one.
    pub fn select(&mut self, side: Side, selection: Selection) {
        match side {
            Side::First => self.first = Some(selection),
            Side::Second => self.second = Some(selection),
        }
    }

    pub fn selection(&self, side: Side) -> Option<Selection> {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    #[cfg(test)]
    pub fn ended(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// Outcome for the first side, once both selections are in.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.first, self.second) {
            (Some(first), Some(second)) => Some(resolve(first, second)),
            _ => None,
        }
    }
}

/// What a resolved round means for each participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub first: ConnectionId,
    pub second: ConnectionId,
    pub first_selection: Selection,
    pub second_selection: Selection,
    /// Outcome from the first participant's point of view.
    pub outcome: Outcome,
}

impl RoundReport {
    pub fn message_for_first(&self) -> Message {
        Message::result(self.second_selection, self.outcome)
    }

    pub fn message_for_second(&self) -> Message {
        Message::result(self.first_selection, self.outcome.inverse())
    }
}

/// Two paired players and the round they are playing.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    first: ConnectionId,
    second: ConnectionId,
    round: Round,
    rounds_played: u32,
    concluded: bool,
}

impl Session {
    pub fn new(id: SessionId, first: ConnectionId, second: ConnectionId) -> Self {
        Self {
            id,
            first,
            second,
            round: Round::new(),
            rounds_played: 0,
            concluded: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn participants(&self) -> [ConnectionId; 2] {
        [self.first, self.second]
    }

    pub fn side_of(&self, conn: ConnectionId) -> Option<Side> {
        if conn == self.first {
            Some(Side::First)
        } else if conn == self.second {
            Some(Side::Second)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn peer_of(&self, conn: ConnectionId) -> Option<ConnectionId> {
        match self.side_of(conn)? {
            Side::First => Some(self.second),
            Side::Second => Some(self.first),
        }
    }

    #[cfg(test)]
    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// True once a decisive round has been resolved.
    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    /// Records a selection and resolves the round when both players have picked.
    ///
    /// A draw replaces the round with a fresh empty one. A decisive result
    /// keeps the resolved round for reporting and concludes the session.
    pub fn select(
        &mut self,
        conn: ConnectionId,
        selection: Selection,
    ) -> Result<Option<RoundReport>, SessionError> {
        if self.concluded {
            return Err(SessionError::Concluded);
        }
        let side = self.side_of(conn).ok_or(SessionError::NotAParticipant)?;
        self.round.select(side, selection);

        let (Some(first_selection), Some(second_selection), Some(outcome)) = (
            self.round.selection(Side::First),
            self.round.selection(Side::Second),
            self.round.outcome(),
        ) else {
            return Ok(None);
        };

        self.rounds_played += 1;
        if outcome.is_draw() {
            self.round = Round::new();
        } else {
            self.concluded = true;
        }

        Ok(Some(RoundReport {
            first: self.first,
            second: self.second,
            first_selection,
            second_selection,
            outcome,
        }))
    }
}
