//! Credential-check collaborator contract.
//!
//! The engine does not do authentication; the presentation layer consumes a
//! [`CredentialStore`] through a plain register/login request-response
//! contract. This module defines the shapes that contract exchanges and an
//! in-memory implementation.

use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "driver";

/// Credential-check errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Registration with a username that already exists
    #[error("username already exists")]
    UsernameTaken,

    /// Login with an unknown username or wrong password
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Request missing a required field
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The store's internal lock was poisoned
    #[error("failed to acquire credential store lock")]
    Lock,
}

/// A stored credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

/// The shape returned to callers: a credential with the password stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<&UserCredential> for UserAccount {
    fn from(credential: &UserCredential) -> Self {
        Self {
            id: credential.id.clone(),
            username: credential.username.clone(),
            role: credential.role.clone(),
        }
    }
}

/// Register/login contract consumed by the presentation collaborator.
pub trait CredentialStore: Send + Sync {
    /// Create an account. Usernames are unique.
    fn register(&self, username: &str, password: &str) -> Result<UserAccount, CredentialError>;

    /// Check a username/password pair and return the matching account.
    fn login(&self, username: &str, password: &str) -> Result<UserAccount, CredentialError>;
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<UserCredential>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn register(&self, username: &str, password: &str) -> Result<UserAccount, CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(CredentialError::MissingField("password"));
        }

        let mut users = self.users.write().map_err(|_| CredentialError::Lock)?;
        if users.iter().any(|u| u.username == username) {
            return Err(CredentialError::UsernameTaken);
        }

        let credential = UserCredential {
            id: format!("user-{}", Utc::now().timestamp_millis()),
            username: username.to_string(),
            password: password.to_string(),
            role: DEFAULT_ROLE.to_string(),
        };
        let account = UserAccount::from(&credential);
        users.push(credential);
        Ok(account)
    }

    fn login(&self, username: &str, password: &str) -> Result<UserAccount, CredentialError> {
        if username.is_empty() {
            return Err(CredentialError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(CredentialError::MissingField("password"));
        }

        let users = self.users.read().map_err(|_| CredentialError::Lock)?;
        users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(UserAccount::from)
            .ok_or(CredentialError::InvalidCredentials)
    }
}
