//! Clip: one short video taking part in a tournament.

use crate::models::bracket::Participant;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a clip.
pub type ClipId = Uuid;

/// A clip stored for a tournament, with its contest stats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    #[serde(rename = "tournamentID")]
    pub tournament_id: TournamentId,
    pub url: String,
    pub wins: u32,
}

impl Clip {
    /// Create a new clip for the tournament. Stats start at zero.
    pub fn new(tournament_id: TournamentId, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            url: url.into(),
            wins: 0,
        }
    }

    /// Snapshot of this clip as a bracket participant.
    pub fn participant(&self) -> Participant {
        Participant::new(self.id, self.url.clone())
    }

    /// Record a contest win for this clip.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }
}
