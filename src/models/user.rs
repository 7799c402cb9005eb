//! User accounts and AuthError.

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a user.
pub type UserId = Uuid;

/// Errors that can occur during registration, login or token checks.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(String),
    #[error("User {0} already exists")]
    UserExists(String),
    /// Unknown user or wrong password; the two are not told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A registered user. The hash never leaves the server.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    pub fn new(name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.name.clone(),
        }
    }
}

/// Register/login body.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an authenticated user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
}

/// Login response.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthDetails {
    pub id: UserId,
    pub username: String,
    pub token: String,
}
