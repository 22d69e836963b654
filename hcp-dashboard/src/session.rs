use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{DashboardError, Result};
use crate::models::UserProfile;

// Keys mirrored from the browser build's local storage.
const AUTH_TOKEN_KEY: &str = "authToken";
const CURRENT_USER_KEY: &str = "currentUser";

/// The one active session: bearer token plus the profile issued with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Boundary for all session reads and writes. Only login and logout write;
/// nothing outside this module touches the underlying keys.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: Session) -> Result<()>;
    async fn load(&self) -> Result<Option<Session>>;
    async fn clear(&self) -> Result<()>;
}

/// In-memory implementation of SessionStore. Saving replaces any previous
/// session; both keys are written and cleared together.
pub struct InMemorySessionStore {
    data: Arc<DashMap<String, Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: Session) -> Result<()> {
        let user = serde_json::to_value(&session.user)
            .map_err(|e| DashboardError::InvalidResponse(e.to_string()))?;
        self.data
            .insert(AUTH_TOKEN_KEY.to_string(), Value::String(session.token));
        self.data.insert(CURRENT_USER_KEY.to_string(), user);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>> {
        let token = self
            .data
            .get(AUTH_TOKEN_KEY)
            .and_then(|entry| entry.as_str().map(|s| s.to_string()));
        let user: Option<UserProfile> = self
            .data
            .get(CURRENT_USER_KEY)
            .and_then(|entry| serde_json::from_value(entry.clone()).ok());

        // A session exists only when both keys are present.
        Ok(match (token, user) {
            (Some(token), Some(user)) => Some(Session { token, user }),
            _ => None,
        })
    }

    async fn clear(&self) -> Result<()> {
        self.data.remove(AUTH_TOKEN_KEY);
        self.data.remove(CURRENT_USER_KEY);
        Ok(())
    }
}
