use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use engine_logging::{engine_debug, engine_info};
use pdfsqueeze_core::{update, Effect, Msg, SessionState};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "pdfsqueeze_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the session cookie from a request's `Cookie` headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| value.parse().ok())
    }

    /// `Set-Cookie` value binding the browser to this session.
    pub fn cookie(&self) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}

struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

/// Per-browser session states. Sessions never share state; the lock is only
/// held while a message is applied, never across an await.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<SessionId, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the caller's live session, or opens a new one. The flag is
    /// true when a new session was opened and the cookie must be set.
    pub fn resolve(&self, candidate: Option<SessionId>) -> (SessionId, bool) {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.prune(&mut sessions, now);

        if let Some(id) = candidate {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, false);
            }
        }

        let id = SessionId::generate();
        sessions.insert(
            id,
            SessionEntry {
                state: SessionState::new(),
                last_seen: now,
            },
        );
        engine_info!("Opened session {} ({} live)", id, sessions.len());
        (id, true)
    }

    /// Applies `msg` to the session and returns the effects to run.
    /// Messages for unknown (expired) sessions are dropped.
    pub fn dispatch(&self, id: SessionId, msg: Msg) -> Vec<Effect> {
        let mut sessions = self.lock();
        let Some(entry) = sessions.get_mut(&id) else {
            engine_debug!("Dropping message for unknown session {}", id);
            return Vec::new();
        };
        let state = std::mem::take(&mut entry.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            engine_debug!("Session {} now {:?}", id, state.view().status);
        }
        entry.state = state;
        entry.last_seen = Instant::now();
        effects
    }

    /// Reads the session state; `None` when the session has expired.
    pub fn read<R>(&self, id: SessionId, f: impl FnOnce(&SessionState) -> R) -> Option<R> {
        let sessions = self.lock();
        sessions.get(&id).map(|entry| f(&entry.state))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&self, sessions: &mut HashMap<SessionId, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            // Keep sessions with a compression in flight so its result lands.
            entry.state.in_flight().is_some() || now.duration_since(entry.last_seen) < self.ttl
        });
        let expired = before - sessions.len();
        if expired > 0 {
            engine_info!("Expired {} idle session(s)", expired);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_round_trips_through_headers() {
        let id = SessionId::generate();
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; other=; x=1"));
        headers.append(
            COOKIE,
            HeaderValue::from_str(&format!("a=b; {SESSION_COOKIE}={id}")).unwrap(),
        );

        assert_eq!(SessionId::from_headers(&headers), Some(id));
        assert!(id.cookie().starts_with(&format!("{SESSION_COOKIE}={id};")));
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("pdfsqueeze_session=not-a-uuid"),
        );
        assert_eq!(SessionId::from_headers(&headers), None);
    }

    #[test]
    fn unknown_ids_get_a_fresh_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (first, created) = store.resolve(None);
        assert!(created);

        let (again, created) = store.resolve(Some(first));
        assert_eq!(again, first);
        assert!(!created);

        let forged = SessionId::generate();
        let (other, created) = store.resolve(Some(forged));
        assert!(created);
        assert_ne!(other, forged);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        let (first, _) = store.resolve(None);
        let (second, created) = store.resolve(Some(first));

        assert!(created);
        assert_ne!(second, first);
        assert_eq!(store.len(), 1);
        assert_eq!(store.read(first, |_| ()), None);
    }
}
