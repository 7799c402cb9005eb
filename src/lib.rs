//! Clip arena: tournaments of short clips and contest brackets behind a JSON API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    build_bracket, create_tournament, delete_tournament, delete_tournaments, edit_tournament,
    king_of_the_hill, record_winner, round_count, shuffle_participants, single_elimination,
    tournament_clips, tournament_contest, tournament_details, validate_payload, AuthProvider,
};
pub use models::{
    AuthDetails, AuthError, Bracket, BracketError, Clip, ClipId, ContestFormat,
    CreateEditTournament, Match, MatchId, MatchSlot, Participant, Round, Tournament,
    TournamentError, TournamentId, User, UserId, UserInfo,
};
pub use store::{MemoryRepository, Repository, StoreError};
