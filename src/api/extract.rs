//! Bearer-token extractor for protected routes.

use crate::api::{ApiError, AppState};
use crate::models::UserInfo;
use actix_web::{dev::Payload, http::header, web::Data, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// The caller, resolved from `Authorization: Bearer <token>`.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub UserInfo);

/// Token part of an `Authorization` header value, if it is a bearer token.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("app state not configured".to_string()))?;
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(ApiError::MissingToken)?;
    Ok(AuthenticatedUser(state.auth.authenticate(token)?))
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
