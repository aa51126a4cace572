//! Per-session context.
//!
//! Each login creates a fresh `SessionContext` keyed by an opaque bearer
//! token. All transient UI state lives here and nowhere else: the selected
//! record, edit mode, and the student's roadmap draft. Logout drops the whole
//! context, so no session-scoped value outlives it. A session left idle
//! past the registry's TTL is dropped the same way.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::roadmap::RoadmapDraft;
use crate::models::user::{CurrentUser, Role};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: CurrentUser,
    /// Lookup key into the document store, not a copy of the record.
    pub selected_record: Option<u64>,
    /// Whether the selected record is open for editing.
    pub edit_mode: bool,
    pub roadmap: Option<RoadmapDraft>,
}

impl SessionContext {
    pub fn new(user: CurrentUser) -> Self {
        Self {
            user,
            selected_record: None,
            edit_mode: false,
            roadmap: None,
        }
    }

    /// Selecting a different record leaves edit mode.
    pub fn select(&mut self, record_id: u64) {
        if self.selected_record != Some(record_id) {
            self.edit_mode = false;
        }
        self.selected_record = Some(record_id);
    }

    pub fn is_editing(&self, record_id: u64) -> bool {
        self.edit_mode && self.selected_record == Some(record_id)
    }
}

struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
}

/// Live sessions for this process. Cloning shares the same map.
///
/// A session idle for longer than `idle_ttl` ends as if logged out: the next
/// lookup drops it, and every `open` sweeps out all expired entries.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    /// Starts a fresh context for `user`. When `replacing` names an existing
    /// session it is dropped first, so nothing from it carries over.
    pub async fn open(&self, user: CurrentUser, replacing: Option<Uuid>) -> Uuid {
        let token = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        if let Some(old) = replacing {
            sessions.remove(&old);
        }

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, "Dropped idle sessions");
        }

        sessions.insert(
            token,
            SessionEntry {
                context: SessionContext::new(user),
                last_seen: now,
            },
        );
        token
    }

    pub async fn get(&self, token: Uuid) -> Option<SessionContext> {
        self.touch(token, |ctx| ctx.clone()).await
    }

    /// Applies `f` to the live context. `None` if the session is gone.
    pub async fn update<R>(
        &self,
        token: Uuid,
        f: impl FnOnce(&mut SessionContext) -> R,
    ) -> Option<R> {
        self.touch(token, f).await
    }

    /// Drops every value held for the session. Returns whether it existed.
    pub async fn close(&self, token: Uuid) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    /// Number of sessions held, expired or not.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Runs `f` on a live session and marks it as seen. An expired session
    /// is removed instead.
    async fn touch<R>(&self, token: Uuid, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&token)?;
        if now.duration_since(entry.last_seen) > self.idle_ttl {
            sessions.remove(&token);
            debug!(%token, "Session expired");
            return None;
        }
        entry.last_seen = now;
        Some(f(&mut entry.context))
    }
}

/// Parses `Authorization: Bearer <uuid>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

/// Extractor for handlers that need a logged-in user.
pub struct CurrentSession {
    pub token: Uuid,
    pub context: SessionContext,
}

impl CurrentSession {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.context.user.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let context = state
            .sessions
            .get(token)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(Self { token, context })
    }
}
