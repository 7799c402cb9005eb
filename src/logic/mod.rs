//! Business logic: contest brackets, auth, tournament CRUD and listings.

pub mod auth;
mod bracket;
pub mod listing;
mod tournament;

pub use auth::AuthProvider;
pub use bracket::{build_bracket, king_of_the_hill, round_count, single_elimination};
pub use listing::{list_tournaments, Listing, ListingQuery, TournamentsPage};
pub use tournament::{
    create_tournament, delete_tournament, delete_tournaments, edit_tournament, record_winner,
    shuffle_participants, tournament_clips, tournament_contest, tournament_details,
    validate_payload,
};
