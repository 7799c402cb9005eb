//! Tournament CRUD: payload checks, ownership, clip diffing, contests and winners.

use crate::logic::bracket::build_bracket;
use crate::models::{
    Bracket, BracketError, Clip, ClipId, ContestFormat, CreateEditTournament, Participant,
    Tournament, TournamentError, TournamentId, UserId, MAX_TOURNAMENT_SIZE, MIN_TOURNAMENT_SIZE,
};
use crate::store::{Repository, StoreError};
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Check a create/edit payload.
///
/// Name and clips are required, size is within bounds, every clip has a URL, URLs are unique,
/// and the declared size matches the number of clips.
pub fn validate_payload(payload: &CreateEditTournament) -> Result<(), TournamentError> {
    if payload.name.trim().is_empty() {
        return Err(TournamentError::Invalid("Name is required".to_string()));
    }
    if payload.tiktoks.is_empty() {
        return Err(TournamentError::Invalid("Tiktoks are required".to_string()));
    }
    if !(MIN_TOURNAMENT_SIZE..=MAX_TOURNAMENT_SIZE).contains(&payload.size) {
        return Err(TournamentError::Invalid(format!(
            "{} is incorrect tournament size (must be {}..={})",
            payload.size, MIN_TOURNAMENT_SIZE, MAX_TOURNAMENT_SIZE
        )));
    }
    let urls = payload.urls();
    if urls.iter().any(|u| u.is_empty()) {
        return Err(TournamentError::Invalid("Every tiktok needs a url".to_string()));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = urls.iter().find(|u| !seen.insert(u.as_str())) {
        return Err(TournamentError::Invalid(format!("Tiktok {} is listed twice", dup)));
    }
    if payload.size != urls.len() {
        return Err(BracketError::MismatchedSizeDeclaration {
            declared: payload.size,
            actual: urls.len(),
        }
        .into());
    }
    Ok(())
}

/// Create a tournament and its clips for `owner`. Names are unique.
pub fn create_tournament(
    repo: &dyn Repository,
    owner: UserId,
    payload: &CreateEditTournament,
) -> Result<Tournament, TournamentError> {
    validate_payload(payload)?;
    let tournament = Tournament::new(payload.name.trim(), owner, payload.size);
    let clips = payload
        .urls()
        .into_iter()
        .map(|url| Clip::new(tournament.id, url))
        .collect();
    repo.insert_tournament(tournament.clone(), clips)
        .map_err(name_taken)?;
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    Ok(tournament)
}

/// Rename/resize a tournament and sync its clips with the payload.
///
/// Clips are matched by URL: kept ones keep their stats, missing ones are deleted, new ones are
/// created. The rename and the clip changes are stored together or not at all.
pub fn edit_tournament(
    repo: &dyn Repository,
    owner: UserId,
    id: TournamentId,
    payload: &CreateEditTournament,
) -> Result<Tournament, TournamentError> {
    validate_payload(payload)?;
    let mut tournament = owned_tournament(repo, owner, id)?;
    let old = repo.clips(id)?;
    let (remove, add) = diff_clips(&old, &payload.urls());
    let add = add.into_iter().map(|url| Clip::new(id, url)).collect();

    tournament.name = payload.name.trim().to_string();
    tournament.size = payload.size;
    repo.update_tournament(&tournament, &remove, add)
        .map_err(name_taken)?;
    log::info!("Edited tournament {} ({})", tournament.name, tournament.id);
    Ok(tournament)
}

/// Delete one tournament of `owner` with its clips.
pub fn delete_tournament(
    repo: &dyn Repository,
    owner: UserId,
    id: TournamentId,
) -> Result<(), TournamentError> {
    owned_tournament(repo, owner, id)?;
    repo.delete_tournaments(&[id])?;
    log::info!("Deleted tournament {}", id);
    Ok(())
}

/// Delete several tournaments of `owner`. Either all of them exist and belong to `owner`, or
/// nothing is deleted.
pub fn delete_tournaments(
    repo: &dyn Repository,
    owner: UserId,
    ids: &[TournamentId],
) -> Result<(), TournamentError> {
    if ids.is_empty() {
        return Err(TournamentError::Invalid("Tournament ids are required".to_string()));
    }
    for &id in ids {
        match repo.tournament(id)? {
            Some(t) if t.is_owned_by(owner) => {}
            _ => return Err(TournamentError::SomeNotFound),
        }
    }
    repo.delete_tournaments(ids)?;
    log::info!("Deleted {} tournament(s)", ids.len());
    Ok(())
}

pub fn tournament_details(
    repo: &dyn Repository,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    repo.tournament(id)?.ok_or(TournamentError::NotFound(id))
}

pub fn tournament_clips(repo: &dyn Repository, id: TournamentId) -> Result<Vec<Clip>, TournamentError> {
    tournament_details(repo, id)?;
    Ok(repo.clips(id)?)
}

/// Build a contest over the tournament's clips in a fresh random order.
pub fn tournament_contest(
    repo: &dyn Repository,
    id: TournamentId,
    format: ContestFormat,
) -> Result<Bracket, TournamentError> {
    let mut participants: Vec<Participant> = tournament_clips(repo, id)?
        .iter()
        .map(Clip::participant)
        .collect();
    shuffle_participants(&mut participants);
    Ok(build_bracket(&participants, format)?)
}

/// Random seeding for a contest.
pub fn shuffle_participants(participants: &mut [Participant]) {
    participants.shuffle(&mut rand::thread_rng());
}

/// Record the winner of a finished contest by its URL.
pub fn record_winner(
    repo: &dyn Repository,
    id: TournamentId,
    url: &str,
) -> Result<(), TournamentError> {
    tournament_details(repo, id)?;
    let url = url.trim();
    if !repo.record_win(id, url)? {
        return Err(TournamentError::ClipNotFound(url.to_string()));
    }
    log::info!("Recorded winner {} for tournament {}", url, id);
    Ok(())
}

fn name_taken(e: StoreError) -> TournamentError {
    match e {
        StoreError::DuplicateTournament(name) => TournamentError::NameTaken(name),
        other => TournamentError::Store(other),
    }
}

fn owned_tournament(
    repo: &dyn Repository,
    owner: UserId,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let tournament = tournament_details(repo, id)?;
    if !tournament.is_owned_by(owner) {
        return Err(TournamentError::NotOwner(id));
    }
    Ok(tournament)
}

/// Split an edit into clips to delete (URL no longer listed) and URLs to create (not stored yet).
fn diff_clips(old: &[Clip], urls: &[String]) -> (Vec<ClipId>, Vec<String>) {
    let wanted: HashSet<&str> = urls.iter().map(String::as_str).collect();
    let stored: HashSet<&str> = old.iter().map(|c| c.url.as_str()).collect();
    let remove = old
        .iter()
        .filter(|c| !wanted.contains(c.url.as_str()))
        .map(|c| c.id)
        .collect();
    let add = urls
        .iter()
        .filter(|u| !stored.contains(u.as_str()))
        .cloned()
        .collect();
    (remove, add)
}
