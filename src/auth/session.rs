use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const SESSION_COOKIE: &str = "bc_session";
pub const SESSION_DAYS: i64 = 7;
pub const INVITATION_DAYS: i64 = 7;
pub const MAGIC_LINK_MINUTES: i64 = 15;

/// Random URL-safe token for sessions, invitation codes and magic links.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Compare secrets without stopping at the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory session table. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session and return its token. Sessions that expired without
    /// being looked up again are dropped here.
    pub fn create(&self, user_id: &str) -> String {
        let now = Utc::now();
        self.prune(now);
        let token = random_token(48);
        self.sessions.insert(token.clone(), Session {
            user_id: user_id.to_string(),
            expires_at: now + Duration::days(SESSION_DAYS),
        });
        token
    }

    fn prune(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        let dropped = before.saturating_sub(self.sessions.len());
        if dropped > 0 {
            tracing::debug!(dropped, "Pruned expired sessions");
        }
    }

    /// User id behind a token. Expired sessions are dropped on lookup.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let now = Utc::now();
        let user_id = {
            let entry = self.sessions.get(token)?;
            if entry.expires_at > now {
                return Some(entry.user_id.clone());
            }
            entry.user_id.clone()
        };
        self.sessions.remove(token);
        tracing::debug!(user_id = %user_id, "Session expired");
        None
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    fn insert_expired(&self, token: &str, user_id: &str) {
        self.sessions.insert(token.to_string(), Session {
            user_id: user_id.to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        });
    }
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_DAYS * 24 * 60 * 60
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Pull the session token out of a `Cookie` header.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resolve_revoke() {
        let store = SessionStore::new();
        let token = store.create("user-1");
        assert_eq!(token.len(), 48);
        assert_eq!(store.resolve(&token).as_deref(), Some("user-1"));
        assert!(store.revoke(&token));
        assert!(store.resolve(&token).is_none());
        assert!(!store.revoke(&token));
    }

    #[test]
    fn test_expired_session_removed() {
        let store = SessionStore::new();
        store.insert_expired("old", "user-1");
        assert!(store.resolve("old").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_prunes_abandoned_sessions() {
        let store = SessionStore::new();
        store.insert_expired("abandoned-1", "user-1");
        store.insert_expired("abandoned-2", "user-2");
        let live = store.create("user-3");
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(&live).as_deref(), Some("user-3"));
    }

    #[test]
    fn test_cookie_parsing() {
        assert_eq!(token_from_cookie_header("theme=dark; bc_session=abc123"), Some("abc123"));
        assert_eq!(token_from_cookie_header("bc_session=xyz"), Some("xyz"));
        assert_eq!(token_from_cookie_header("bc_session=; other=1"), None);
        assert_eq!(token_from_cookie_header("other=1"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("bc_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("s3cret-token", "s3cret-token"));
        assert!(!constant_time_eq("s3cret-token", "s3cret-tokeN"));
        assert!(!constant_time_eq("s3cret", "s3cret-token"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_random_tokens_differ() {
        assert_ne!(random_token(24), random_token(24));
    }
}
