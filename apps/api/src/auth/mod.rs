//! Authentication: the credential-provider seam and per-session state.
//!
//! `AppState` holds an `Arc<dyn CredentialProvider>`. The fixed two-user
//! table is one implementation; any other store can replace it without
//! touching the handlers.

pub mod handlers;
pub mod session;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::user::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the identity's role when `secret` matches.
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Role, AuthError>;
}

struct Credential {
    secret: String,
    role: Role,
}

/// In-memory identity → {secret, role} table. Secrets are compared as plain
/// strings; there is no hashing, lockout, or rate limiting.
#[derive(Default)]
pub struct StaticCredentialTable {
    entries: HashMap<String, Credential>,
}

impl StaticCredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, identity: &str, secret: &str, role: Role) -> Self {
        self.entries.insert(
            identity.to_string(),
            Credential {
                secret: secret.to_string(),
                role,
            },
        );
        self
    }

    /// The two demo accounts of the reference deployment.
    pub fn reference() -> Self {
        Self::new()
            .with_user("teacher@test.com", "teacher123", Role::Teacher)
            .with_user("student@test.com", "student123", Role::Student)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialTable {
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Role, AuthError> {
        match self.entries.get(identity) {
            Some(credential) if credential.secret == secret => Ok(credential.role),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
