//! ApiError: every failure a handler can return, rendered as `{"message": ...}`.

use crate::models::{AuthError, BracketError, TournamentError};
use crate::store::StoreError;
use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every error response and of plain success messages.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or malformed token")]
    MissingToken,
    #[error("Could not parse id {0}")]
    BadId(String),
    #[error("There is no page")]
    NoPage,
    /// Request body or query could not be read.
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Bracket(#[from] BracketError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

impl From<BlockingError> for ApiError {
    fn from(e: BlockingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::DuplicateUser(_) | StoreError::DuplicateTournament(_) => StatusCode::BAD_REQUEST,
        StoreError::TournamentNotFound(_) => StatusCode::NOT_FOUND,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::BadId(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoPage => StatusCode::MOVED_PERMANENTLY,
            ApiError::Auth(e) => match e {
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Store(e) => store_status(e),
                AuthError::Invalid(_) | AuthError::UserExists(_) | AuthError::InvalidCredentials => {
                    StatusCode::BAD_REQUEST
                }
            },
            ApiError::Tournament(e) => match e {
                TournamentError::NotFound(_) => StatusCode::NOT_FOUND,
                TournamentError::NotOwner(_) => StatusCode::FORBIDDEN,
                TournamentError::Store(e) => store_status(e),
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::Bracket(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => store_status(e),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(MessageResponse::new(self.to_string()))
    }
}
