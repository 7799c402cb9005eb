//! Contest bracket: participants, match slots, matches and rounds.

use crate::models::clip::ClipId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a bracket match.
pub type MatchId = Uuid;

/// Errors that can occur while building a bracket.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    /// Fewer than two participants.
    #[error("Need at least 2 tiktoks to build a contest, got {count}")]
    InvalidParticipantCount { count: usize },
    /// The format is known but no builder exists for it.
    #[error("{0} contest is not supported yet")]
    UnsupportedFormat(ContestFormat),
    /// The format string names no known format.
    #[error("{0} is not allowed tournament format")]
    UnknownFormat(String),
    /// Declared tournament size differs from the number of tiktoks.
    #[error("Tournament size and count of tiktoks mismatch ({declared} != {actual})")]
    MismatchedSizeDeclaration { declared: usize, actual: usize },
}

/// Contest format requested for a bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestFormat {
    SingleElimination,
    KingOfTheHill,
    /// Reserved; building fails with `UnsupportedFormat`.
    DoubleElimination,
    /// Reserved; building fails with `UnsupportedFormat`.
    SwissSystem,
}

impl ContestFormat {
    pub const ALL: [ContestFormat; 4] = [
        ContestFormat::SingleElimination,
        ContestFormat::KingOfTheHill,
        ContestFormat::DoubleElimination,
        ContestFormat::SwissSystem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContestFormat::SingleElimination => "single_elimination",
            ContestFormat::KingOfTheHill => "king_of_the_hill",
            ContestFormat::DoubleElimination => "double_elimination",
            ContestFormat::SwissSystem => "swiss_system",
        }
    }
}

impl fmt::Display for ContestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContestFormat {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContestFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| BracketError::UnknownFormat(s.to_string()))
    }
}

/// A clip taking part in a contest. Only the URL goes over the wire.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(skip)]
    pub clip_id: ClipId,
    #[serde(rename = "tiktokURL")]
    pub url: String,
}

impl Participant {
    pub fn new(clip_id: ClipId, url: impl Into<String>) -> Self {
        Self {
            clip_id,
            url: url.into(),
        }
    }
}

/// One side of a match: a participant, or the winner of an earlier match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchSlot {
    Participant(Participant),
    Winner {
        #[serde(rename = "matchID")]
        match_id: MatchId,
    },
}

impl MatchSlot {
    /// Id of the match this slot waits on, if any. For clients and tests walking a built
    /// bracket; the builders never read slots back.
    pub fn source_match(&self) -> Option<MatchId> {
        match self {
            MatchSlot::Participant(_) => None,
            MatchSlot::Winner { match_id } => Some(*match_id),
        }
    }
}

impl From<Participant> for MatchSlot {
    fn from(p: Participant) -> Self {
        MatchSlot::Participant(p)
    }
}

/// A single pairing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "matchID")]
    pub id: MatchId,
    pub first_option: MatchSlot,
    pub second_option: MatchSlot,
}

impl Match {
    pub fn new(first_option: MatchSlot, second_option: MatchSlot) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_option,
            second_option,
        }
    }

    /// Slot standing for whoever wins this match.
    pub fn winner_slot(&self) -> MatchSlot {
        MatchSlot::Winner { match_id: self.id }
    }

    /// Both sides, first option first. Inspection helper for walking a built bracket.
    pub fn slots(&self) -> [&MatchSlot; 2] {
        [&self.first_option, &self.second_option]
    }
}

/// Matches played in one round (1-based).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round: usize,
    pub matches: Vec<Match>,
}

/// A complete contest: every round, first round first.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub count_matches: usize,
    pub rounds: Vec<Round>,
}

impl Bracket {
    /// Number of matches across all rounds.
    pub fn total_matches(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }
}
