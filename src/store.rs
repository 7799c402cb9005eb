//! Repository: storage of users, tournaments and their clips.
//!
//! [`Repository`] is the seam the request layer talks to. [`MemoryRepository`] keeps everything
//! in one `RwLock`-guarded set of maps, the same way the server keeps its shared state.

use crate::models::{Clip, ClipId, Tournament, TournamentId, User, UserId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("lock error")]
    LockPoisoned,
    #[error("User {0} already exists")]
    DuplicateUser(String),
    #[error("Tournament {0} already exists")]
    DuplicateTournament(String),
    #[error("Tournament with id:{0} doesn't exist")]
    TournamentNotFound(TournamentId),
}

/// Storage operations used by auth and tournament logic.
pub trait Repository: Send + Sync {
    /// Insert a user; fails if the name is taken.
    fn insert_user(&self, user: User) -> Result<(), StoreError>;
    fn user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Insert a tournament together with its clips; fails if the name is taken.
    fn insert_tournament(&self, tournament: Tournament, clips: Vec<Clip>) -> Result<(), StoreError>;
    /// Replace a stored tournament and sync its clips in one step: remove some clips, append
    /// new ones. Fails without changing anything if the tournament is gone or another
    /// tournament has its name.
    fn update_tournament(
        &self,
        tournament: &Tournament,
        remove: &[ClipId],
        add: Vec<Clip>,
    ) -> Result<(), StoreError>;
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;
    /// All tournaments, oldest first.
    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError>;
    /// Tournaments created by one user, oldest first.
    fn tournaments_of_user(&self, user_id: UserId) -> Result<Vec<Tournament>, StoreError>;
    /// Delete tournaments and their clips. Unknown ids are ignored.
    fn delete_tournaments(&self, ids: &[TournamentId]) -> Result<(), StoreError>;

    /// Clips of a tournament in insertion order.
    fn clips(&self, tournament_id: TournamentId) -> Result<Vec<Clip>, StoreError>;
    /// Count a contest win for the clip with this URL and a play for its tournament.
    /// Returns false if the tournament has no such clip.
    fn record_win(&self, tournament_id: TournamentId, url: &str) -> Result<bool, StoreError>;
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Insertion order, oldest first.
    tournaments: Vec<Tournament>,
    clips: HashMap<TournamentId, Vec<Clip>>,
}

/// In-memory repository.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Repository for MemoryRepository {
    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if g.users.values().any(|u| u.name == user.name) {
            return Err(StoreError::DuplicateUser(user.name));
        }
        g.users.insert(user.id, user);
        Ok(())
    }

    fn user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.values().find(|u| u.name == name).cloned())
    }

    fn insert_tournament(&self, tournament: Tournament, clips: Vec<Clip>) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if g.tournaments.iter().any(|t| t.name == tournament.name) {
            return Err(StoreError::DuplicateTournament(tournament.name));
        }
        g.clips.insert(tournament.id, clips);
        g.tournaments.push(tournament);
        Ok(())
    }

    fn update_tournament(
        &self,
        tournament: &Tournament,
        remove: &[ClipId],
        add: Vec<Clip>,
    ) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if g
            .tournaments
            .iter()
            .any(|t| t.name == tournament.name && t.id != tournament.id)
        {
            return Err(StoreError::DuplicateTournament(tournament.name.clone()));
        }
        let Tables {
            tournaments, clips, ..
        } = &mut *g;
        let stored = tournaments
            .iter_mut()
            .find(|t| t.id == tournament.id)
            .ok_or(StoreError::TournamentNotFound(tournament.id))?;
        let stored_clips = clips.entry(tournament.id).or_default();
        stored_clips.retain(|c| !remove.contains(&c.id));
        stored_clips.extend(add);
        *stored = tournament.clone();
        Ok(())
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self.read()?.tournaments.iter().find(|t| t.id == id).cloned())
    }

    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        Ok(self.read()?.tournaments.clone())
    }

    fn tournaments_of_user(&self, user_id: UserId) -> Result<Vec<Tournament>, StoreError> {
        Ok(self
            .read()?
            .tournaments
            .iter()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    fn delete_tournaments(&self, ids: &[TournamentId]) -> Result<(), StoreError> {
        let mut g = self.write()?;
        g.tournaments.retain(|t| !ids.contains(&t.id));
        for id in ids {
            g.clips.remove(id);
        }
        Ok(())
    }

    fn clips(&self, tournament_id: TournamentId) -> Result<Vec<Clip>, StoreError> {
        Ok(self
            .read()?
            .clips
            .get(&tournament_id)
            .cloned()
            .unwrap_or_default())
    }

    fn record_win(&self, tournament_id: TournamentId, url: &str) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(clip) = g
            .clips
            .get_mut(&tournament_id)
            .and_then(|clips| clips.iter_mut().find(|c| c.url == url))
        else {
            return Ok(false);
        };
        clip.add_win();
        let tournament = g
            .tournaments
            .iter_mut()
            .find(|t| t.id == tournament_id)
            .ok_or(StoreError::TournamentNotFound(tournament_id))?;
        tournament.times_played += 1;
        Ok(true)
    }
}
