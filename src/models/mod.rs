//! Data structures for clip tournaments: users, tournaments, clips, contest brackets.

mod bracket;
mod clip;
mod tournament;
mod user;

pub use bracket::{
    Bracket, BracketError, ContestFormat, Match, MatchId, MatchSlot, Participant, Round,
};
pub use clip::{Clip, ClipId};
pub use tournament::{
    CreateClip, CreateEditTournament, Tournament, TournamentError, TournamentId,
    MAX_TOURNAMENT_SIZE, MIN_TOURNAMENT_SIZE,
};
pub use user::{AuthDetails, AuthError, Credentials, User, UserId, UserInfo};
