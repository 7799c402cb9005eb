//! Tournament, its create/edit payload, and TournamentError.

use crate::models::bracket::BracketError;
use crate::models::user::UserId;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Smallest tournament size accepted on create/edit.
pub const MIN_TOURNAMENT_SIZE: usize = 4;
/// Largest tournament size accepted on create/edit.
pub const MAX_TOURNAMENT_SIZE: usize = 64;

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Payload failed a field check.
    #[error("{0}")]
    Invalid(String),
    #[error("Tournament {0} already exists")]
    NameTaken(String),
    #[error("Tournament with id:{0} doesn't exist")]
    NotFound(TournamentId),
    /// One id of a batch is unknown or owned by someone else.
    #[error("One or more tournaments doesn't exist")]
    SomeNotFound,
    #[error("Tournament with id:{0} belongs to another user")]
    NotOwner(TournamentId),
    #[error("Tiktok {0} is not part of this tournament")]
    ClipNotFound(String),
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A tournament of clips, owned by the user that created it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    /// Declared number of clips.
    pub size: usize,
    /// Contests finished with a recorded winner.
    pub times_played: u32,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    pub fn new(name: impl Into<String>, user_id: UserId, size: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            user_id,
            size,
            times_played: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// A clip URL as sent by the client.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateClip {
    #[serde(default)]
    pub url: String,
}

/// Body for creating or editing a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateEditTournament {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub tiktoks: Vec<CreateClip>,
}

impl CreateEditTournament {
    pub fn new(name: impl Into<String>, urls: &[&str]) -> Self {
        Self {
            name: name.into(),
            size: urls.len(),
            tiktoks: urls
                .iter()
                .map(|u| CreateClip { url: u.to_string() })
                .collect(),
        }
    }

    /// Clip URLs, trimmed, in payload order.
    pub fn urls(&self) -> Vec<String> {
        self.tiktoks.iter().map(|t| t.url.trim().to_string()).collect()
    }
}
