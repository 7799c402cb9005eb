//! Registration, login and bearer tokens.

use crate::models::{AuthDetails, AuthError, User, UserId, UserInfo};
use crate::store::{Repository, StoreError};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use password_hash::SaltString;
use rand::rngs::OsRng;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Opaque bearer token handed out on login.
pub type Token = Uuid;

struct Session {
    user_id: UserId,
    username: String,
    expires_at: DateTime<Utc>,
}

/// Issues and checks bearer tokens; users are kept in the repository.
pub struct AuthProvider {
    repo: Arc<dyn Repository>,
    sessions: RwLock<HashMap<Token, Session>>,
    token_ttl: Duration,
}

/// Usernames are case-insensitive: stored and looked up trimmed and lowercase.
pub fn normalize_username(name: &str) -> String {
    name.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

impl AuthProvider {
    pub fn new(repo: Arc<dyn Repository>, token_ttl: Duration) -> Self {
        Self {
            repo,
            sessions: RwLock::new(HashMap::new()),
            token_ttl,
        }
    }

    /// Create an account. Name and password are required; names are unique.
    pub fn register(&self, name: &str, password: &str) -> Result<User, AuthError> {
        let name = normalize_username(name);
        if name.is_empty() {
            return Err(AuthError::Invalid("Name is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Invalid("Password is required".to_string()));
        }
        let user = User::new(name, hash_password(password)?);
        self.repo.insert_user(user.clone()).map_err(|e| match e {
            StoreError::DuplicateUser(name) => AuthError::UserExists(name),
            other => AuthError::Store(other),
        })?;
        log::info!("Registered user {}", user.name);
        Ok(user)
    }

    /// Check credentials and issue a token valid for the configured lifetime.
    pub fn login(&self, name: &str, password: &str) -> Result<AuthDetails, AuthError> {
        let name = normalize_username(name);
        let user = match self.repo.user_by_name(&name)? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                log::warn!("Failed login for {}", name);
                return Err(AuthError::InvalidCredentials);
            }
        };
        let token = Uuid::new_v4();
        let session = Session {
            user_id: user.id,
            username: user.name.clone(),
            expires_at: Utc::now()
                .checked_add_signed(self.token_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(token, session);
        Ok(AuthDetails {
            id: user.id,
            username: user.name,
            token: token.to_string(),
        })
    }

    /// Resolve a bearer token to its user. Expired tokens are dropped.
    pub fn authenticate(&self, token: &str) -> Result<UserInfo, AuthError> {
        let token: Token = token.trim().parse().map_err(|_| AuthError::InvalidToken)?;
        let now = Utc::now();
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        let expired = match sessions.get(&token) {
            Some(s) if s.expires_at > now => {
                return Ok(UserInfo {
                    id: s.user_id,
                    username: s.username.clone(),
                });
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(&token);
        }
        Err(AuthError::InvalidToken)
    }

    /// Drop every expired token. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, AuthError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRepository;

    fn provider(repo: &Arc<MemoryRepository>, ttl: Duration) -> AuthProvider {
        let repo: Arc<dyn Repository> = Arc::<MemoryRepository>::clone(repo);
        AuthProvider::new(repo, ttl)
    }

    #[test]
    fn expired_tokens_are_rejected_and_evicted() {
        let repo = Arc::new(MemoryRepository::new());
        let instant = provider(&repo, Duration::zero());
        instant.register("alice", "hunter2").unwrap();

        let details = instant.login("alice", "hunter2").unwrap();
        assert!(matches!(
            instant.authenticate(&details.token),
            Err(AuthError::InvalidToken)
        ));
        // evicted by the failed check
        assert_eq!(instant.purge_expired().unwrap(), 0);

        let stale = provider(&repo, Duration::zero());
        stale.login("alice", "hunter2").unwrap();
        stale.login("alice", "hunter2").unwrap();
        assert_eq!(stale.purge_expired().unwrap(), 2);
        assert_eq!(stale.purge_expired().unwrap(), 0);
    }

    #[test]
    fn live_tokens_survive_a_purge() {
        let repo = Arc::new(MemoryRepository::new());
        let auth = provider(&repo, Duration::hours(1));
        let user = auth.register("bob", "hunter2").unwrap();

        let details = auth.login("BOB", "hunter2").unwrap();
        assert_eq!(auth.purge_expired().unwrap(), 0);
        assert_eq!(auth.authenticate(&details.token).unwrap(), user.info());
        assert!(matches!(
            auth.authenticate(&Uuid::new_v4().to_string()),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn usernames_are_trimmed_and_lowercased() {
        assert_eq!(normalize_username("  Alice "), "alice");
    }

    #[test]
    fn hash_verifies_only_the_same_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not a phc string"));
    }
}
