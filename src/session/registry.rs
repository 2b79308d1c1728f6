/// Session registry using ArcSwap
///
/// Maps session ids (carried in a cookie) to their state. Lookups are lock-free;
/// inserts and removals swap in a new map. Each session sits behind its own
/// async mutex so one browser never has two submissions in flight.

use crate::session::types::Session;
use arc_swap::ArcSwap;
use chrono::{Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Session identifier stored in the browser cookie
pub type SessionId = Uuid;

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<Session>>;

/// Lock-free registry of live sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: ArcSwap<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: ArcSwap::new(Arc::new(HashMap::new())),
        }
    }

    /// Look up a session (lock-free read)
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.load().get(id).cloned()
    }

    /// Return the session for `id`, creating a fresh one if it is unknown or absent.
    ///
    /// The returned flag is true when a new session was created and the caller
    /// must hand its id back to the browser.
    pub fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle, bool) {
        if let Some(id) = id {
            if let Some(handle) = self.get(&id) {
                return (id, handle, false);
            }
        }

        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(Session::new()));
        self.sessions.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(id, Arc::clone(&handle));
            next
        });

        tracing::info!("🆕 Created session {} ({} live)", id, self.len());
        (id, handle, true)
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, id: &SessionId) -> bool {
        if !self.sessions.load().contains_key(id) {
            return false;
        }

        self.sessions.rcu(|current| {
            let mut next = (**current).clone();
            next.remove(id);
            next
        });

        tracing::info!("🗑️ Removed session {}", id);
        true
    }

    /// Drop every session idle for longer than `ttl`.
    ///
    /// Sessions whose lock is held are busy and therefore not idle.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            tracing::warn!("Session TTL {} reaches past the earliest timestamp, nothing evicted", ttl);
            return 0;
        };
        let expired: Vec<SessionId> = self
            .sessions
            .load()
            .iter()
            .filter_map(|(id, handle)| match handle.try_lock() {
                Ok(session) if session.last_seen < cutoff => Some(*id),
                _ => None,
            })
            .collect();

        if expired.is_empty() {
            return 0;
        }

        self.sessions.rcu(|current| {
            let mut next = (**current).clone();
            for id in &expired {
                next.remove(id);
            }
            next
        });

        tracing::info!("🧹 Evicted {} idle sessions ({} live)", expired.len(), self.len());
        expired.len()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_reuses_known_session() {
        let registry = SessionRegistry::new();
        let (id, first, created) = registry.get_or_create(None);
        assert!(created);

        let (same_id, second, created) = registry.get_or_create(Some(id));
        assert!(!created);
        assert_eq!(same_id, id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id_gets_fresh_session() {
        let registry = SessionRegistry::new();
        let stale = Uuid::new_v4();
        let (id, _, created) = registry.get_or_create(Some(stale));
        assert!(created);
        assert_ne!(id, stale);
    }

    #[test]
    fn test_remove() {
        let registry = SessionRegistry::new();
        let (id, _, _) = registry.get_or_create(None);
        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_evict_idle_only_drops_stale_sessions() {
        let registry = SessionRegistry::new();
        let (stale_id, stale, _) = registry.get_or_create(None);
        let (fresh_id, _, _) = registry.get_or_create(None);

        stale.lock().await.last_seen = Utc::now() - Duration::hours(2);

        assert_eq!(registry.evict_idle(Duration::hours(1)), 1);
        assert!(registry.get(&stale_id).is_none());
        assert!(registry.get(&fresh_id).is_some());
    }

    #[tokio::test]
    async fn test_evict_idle_with_out_of_range_ttl_keeps_sessions() {
        let registry = SessionRegistry::new();
        let (id, handle, _) = registry.get_or_create(None);
        handle.lock().await.last_seen = Utc::now() - Duration::days(365);

        assert_eq!(registry.evict_idle(Duration::milliseconds(i64::MAX)), 0);
        assert!(registry.get(&id).is_some());
    }

    #[tokio::test]
    async fn test_evict_idle_skips_busy_sessions() {
        let registry = SessionRegistry::new();
        let (id, handle, _) = registry.get_or_create(None);
        let mut guard = handle.lock().await;
        guard.last_seen = Utc::now() - Duration::hours(2);

        assert_eq!(registry.evict_idle(Duration::hours(1)), 0);
        drop(guard);
        assert_eq!(registry.evict_idle(Duration::hours(1)), 1);
        assert!(registry.get(&id).is_none());
    }
}
