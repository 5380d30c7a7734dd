//! In-process session registry backing the cookie login
//!
//! Sessions live in a process-wide map from opaque token to the logged-in
//! user record, with a fixed time-to-live. Expired entries are dropped
//! lazily on lookup, so no background sweeper is needed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::User;

/// Name of the session cookie issued on login
pub const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Clone)]
struct SessionEntry {
    user: User,
    expires_at: Instant,
}

/// Shared map of active sessions
///
/// Cloning is cheap and every clone sees the same sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a session for `user` and return the opaque token to hand out
    pub async fn insert(&self, user: User) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            user,
            expires_at: Instant::now() + self.ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(token.clone(), entry);
        tracing::debug!("Session opened, {} active", entries.len());
        token
    }

    /// Look up the user behind `token`, pruning it if it has expired
    pub async fn get(&self, token: &str) -> Option<User> {
        let mut entries = self.entries.write().await;
        match entries.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.user.clone()),
            Some(_) => {
                entries.remove(token);
                None
            }
            None => None,
        }
    }

    /// End the session behind `token`; false if no live session was found
    pub async fn remove(&self, token: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.remove(token) {
            Some(entry) => entry.expires_at > Instant::now(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(login_name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: login_name.to_string(),
            last_name: String::new(),
            login_name: login_name.to_string(),
            location: String::new(),
            description: String::new(),
            occupation: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_returns_user() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let user = sample_user("ansel");

        let token = sessions.insert(user.clone()).await;
        let found = sessions.get(&token).await.unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.login_name, "ansel");
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let user = sample_user("ansel");

        let first = sessions.insert(user.clone()).await;
        let second = sessions.insert(user).await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_token_yields_nothing() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        assert!(sessions.get("no-such-token").await.is_none());
        assert!(!sessions.remove("no-such-token").await);
    }

    #[tokio::test]
    async fn test_expired_session_is_pruned_on_lookup() {
        let sessions = SessionStore::new(Duration::ZERO);
        let token = sessions.insert(sample_user("ansel")).await;

        assert!(sessions.get(&token).await.is_none());
        // Pruned by the lookup above, so ending it again reports nothing
        assert!(!sessions.remove(&token).await);
    }

    #[tokio::test]
    async fn test_remove_ends_session() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let token = sessions.insert(sample_user("ansel")).await;

        assert!(sessions.remove(&token).await);
        assert!(sessions.get(&token).await.is_none());
        assert!(!sessions.remove(&token).await);
    }
}
