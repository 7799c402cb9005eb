//! REST API under `/api`: auth, tournaments, contests.
//!
//! Protected routes take an [`AuthenticatedUser`]; everything else is public.

mod error;
mod extract;

pub use error::{ApiError, MessageResponse};
pub use extract::AuthenticatedUser;

use crate::logic::{self, list_tournaments, AuthProvider, Listing, ListingQuery, TournamentsPage};
use crate::models::{ContestFormat, CreateEditTournament, Credentials, Tournament, TournamentId};
use crate::store::Repository;
use actix_web::{
    delete, get, post,
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state: the repository and the token issuer on top of it.
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub auth: AuthProvider,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, token_ttl: Duration) -> Self {
        Self {
            auth: AuthProvider::new(Arc::clone(&repo), token_ttl),
            repo,
        }
    }
}

type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct CreatedResponse {
    message: String,
    tournament: Tournament,
}

#[derive(Deserialize)]
struct ContestQuery {
    #[serde(rename = "type", default)]
    format: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TournamentIdsBody {
    #[serde(default)]
    tournament_ids: Vec<String>,
}

#[derive(Deserialize)]
struct WinnerBody {
    #[serde(rename = "tiktokURL", default)]
    url: String,
}

fn parse_id(raw: &str) -> Result<TournamentId, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadId(raw.to_string()))
}

#[get("/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "clip-arena",
    })
}

/// Register a new user (password is hashed off the async workers).
#[post("/auth/register")]
async fn api_register(state: Data<AppState>, body: Json<Credentials>) -> ApiResult {
    let Credentials { name, password } = body.into_inner();
    let user = web::block(move || state.auth.register(&name, &password)).await??;
    Ok(HttpResponse::Created().json(serde_json::json!({ "data": { "user": user } })))
}

/// Log in and receive a bearer token.
#[post("/auth/login")]
async fn api_login(state: Data<AppState>, body: Json<Credentials>) -> ApiResult {
    let Credentials { name, password } = body.into_inner();
    let details = web::block(move || state.auth.login(&name, &password)).await??;
    Ok(HttpResponse::Ok().json(details))
}

#[get("/auth/whoami")]
async fn api_whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}

/// All tournaments, paged. An empty page past the first one answers 301.
#[get("/tournament")]
async fn api_list_tournaments(state: Data<AppState>, query: Query<ListingQuery>) -> ApiResult {
    let listing = Listing::from(query.into_inner());
    let page = list_tournaments(state.repo.tournaments()?, &listing);
    if page.tournaments.is_empty() && listing.page > 1 {
        return Err(ApiError::NoPage);
    }
    Ok(HttpResponse::Ok().json(page))
}

/// Build a contest bracket over the tournament's clips (`?type=single_elimination`).
#[get("/tournament/contest/{id}")]
async fn api_tournament_contest(
    state: Data<AppState>,
    path: Path<String>,
    query: Query<ContestQuery>,
) -> ApiResult {
    let format: ContestFormat = query.format.parse()?;
    let id = parse_id(&path)?;
    let bracket = logic::tournament_contest(state.repo.as_ref(), id, format)?;
    Ok(HttpResponse::Ok().json(bracket))
}

#[post("/tournament/create")]
async fn api_create_tournament(
    state: Data<AppState>,
    user: AuthenticatedUser,
    body: Json<CreateEditTournament>,
) -> ApiResult {
    let tournament = logic::create_tournament(state.repo.as_ref(), user.0.id, &body)?;
    Ok(HttpResponse::Ok().json(CreatedResponse {
        message: format!("Successfully created tournament {}", tournament.name),
        tournament,
    }))
}

#[post("/tournament/edit/{id}")]
async fn api_edit_tournament(
    state: Data<AppState>,
    user: AuthenticatedUser,
    path: Path<String>,
    body: Json<CreateEditTournament>,
) -> ApiResult {
    let id = parse_id(&path)?;
    let tournament = logic::edit_tournament(state.repo.as_ref(), user.0.id, id, &body)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Successfully edited tournament {}",
        tournament.name
    ))))
}

#[delete("/tournament/delete/{id}")]
async fn api_delete_tournament(
    state: Data<AppState>,
    user: AuthenticatedUser,
    path: Path<String>,
) -> ApiResult {
    let id = parse_id(&path)?;
    logic::delete_tournament(state.repo.as_ref(), user.0.id, id)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Successfully deleted tournament {}",
        id
    ))))
}

#[delete("/tournament/delete")]
async fn api_delete_tournaments(
    state: Data<AppState>,
    user: AuthenticatedUser,
    body: Json<TournamentIdsBody>,
) -> ApiResult {
    let ids = body
        .tournament_ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<Vec<_>, _>>()?;
    logic::delete_tournaments(state.repo.as_ref(), user.0.id, &ids)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully deleted tournaments")))
}

#[get("/tournament/tiktoks/{id}")]
async fn api_tournament_clips(state: Data<AppState>, path: Path<String>) -> ApiResult {
    let id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(logic::tournament_clips(state.repo.as_ref(), id)?))
}

#[get("/tournament/{id}")]
async fn api_tournament_details(state: Data<AppState>, path: Path<String>) -> ApiResult {
    let id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(logic::tournament_details(state.repo.as_ref(), id)?))
}

/// Record the winning clip of a finished contest.
#[post("/tournament/{id}")]
async fn api_tournament_winner(
    state: Data<AppState>,
    path: Path<String>,
    body: Json<WinnerBody>,
) -> ApiResult {
    let id = parse_id(&path)?;
    logic::record_winner(state.repo.as_ref(), id, &body.url)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Successfully registered winner {}",
        body.url.trim()
    ))))
}

/// The caller's own tournaments, paged.
#[get("/user/tournaments")]
async fn api_user_tournaments(
    state: Data<AppState>,
    user: AuthenticatedUser,
    query: Query<ListingQuery>,
) -> ApiResult {
    let listing = Listing::from(query.into_inner());
    let page: TournamentsPage =
        list_tournaments(state.repo.tournaments_of_user(user.0.id)?, &listing);
    Ok(HttpResponse::Ok().json(page))
}

/// Register every route under `/api`, plus JSON/query error handlers that answer with a
/// `{"message": ...}` body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .service(api_health)
            .service(api_register)
            .service(api_login)
            .service(api_whoami)
            .service(api_list_tournaments)
            .service(api_tournament_contest)
            // before the `/tournament/{id}` routes
            .service(api_create_tournament)
            .service(api_edit_tournament)
            .service(api_delete_tournament)
            .service(api_delete_tournaments)
            .service(api_tournament_clips)
            .service(api_tournament_details)
            .service(api_tournament_winner)
            .service(api_user_tournaments),
    );
}
