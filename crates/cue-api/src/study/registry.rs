use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::session::ReviewSession;

struct Entry<S> {
    owner: Uuid,
    deck_id: Uuid,
    session: ReviewSession<S>,
    last_access: DateTime<Utc>,
}

/// Live study sessions, keyed by session id.
///
/// A session is only visible to the user who started it; lookups by anyone
/// else behave as if the session did not exist.
pub struct SessionRegistry<S> {
    inner: Arc<Mutex<HashMap<Uuid, Entry<S>>>>,
}

impl<S> Clone for SessionRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Entry<S>>> {
        // Entries stay consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `session` and return its id.
    ///
    /// A user has at most one session per deck: an older one for the same
    /// deck is dropped. Its pending writes still complete.
    pub fn insert(&self, owner: Uuid, deck_id: Uuid, session: ReviewSession<S>) -> Uuid {
        let id = Uuid::new_v4();
        let mut entries = self.entries();
        entries.retain(|_, e| !(e.owner == owner && e.deck_id == deck_id));
        entries.insert(
            id,
            Entry {
                owner,
                deck_id,
                session,
                last_access: Utc::now(),
            },
        );
        id
    }

    /// Run `f` against the session if `owner` owns it. `f` also gets the deck id.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        owner: Uuid,
        f: impl FnOnce(&mut ReviewSession<S>, Uuid) -> R,
    ) -> Option<R> {
        let mut entries = self.entries();
        let entry = entries.get_mut(&id).filter(|e| e.owner == owner)?;
        entry.last_access = Utc::now();
        Some(f(&mut entry.session, entry.deck_id))
    }

    pub fn remove(&self, id: Uuid, owner: Uuid) -> Option<ReviewSession<S>> {
        let mut entries = self.entries();
        if entries.get(&id).is_some_and(|e| e.owner == owner) {
            entries.remove(&id).map(|e| e.session)
        } else {
            None
        }
    }

    /// Drop sessions not touched for longer than `max_idle`. Returns how many went.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        self.sweep_idle_at(max_idle, Utc::now())
    }

    pub fn sweep_idle_at(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, e| now - e.last_access <= max_idle);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{review::RetryPolicy, study::SessionState, test_support::MemoryStore};

    fn new_session(store: &Arc<MemoryStore>) -> ReviewSession<MemoryStore> {
        ReviewSession::new(Uuid::new_v4(), Arc::clone(store), RetryPolicy::no_retry())
    }

    #[test]
    fn test_only_owner_sees_session() {
        let store = Arc::new(MemoryStore::new());
        let registry = SessionRegistry::new();
        let owner = Uuid::new_v4();
        let deck_id = Uuid::new_v4();
        let id = registry.insert(owner, deck_id, new_session(&store));

        assert_eq!(
            registry.with_session(id, owner, |s, deck| (s.state(), deck)),
            Some((SessionState::Idle, deck_id))
        );
        assert!(registry.with_session(id, Uuid::new_v4(), |_, _| ()).is_none());
        assert!(registry.remove(id, Uuid::new_v4()).is_none());
        assert!(registry.remove(id, owner).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_new_session_replaces_same_deck() {
        let store = Arc::new(MemoryStore::new());
        let registry = SessionRegistry::new();
        let owner = Uuid::new_v4();
        let deck_id = Uuid::new_v4();

        let first = registry.insert(owner, deck_id, new_session(&store));
        let second = registry.insert(owner, deck_id, new_session(&store));
        registry.insert(owner, Uuid::new_v4(), new_session(&store));
        registry.insert(Uuid::new_v4(), deck_id, new_session(&store));

        assert_eq!(registry.len(), 3);
        assert!(registry.with_session(first, owner, |_, _| ()).is_none());
        assert!(registry.with_session(second, owner, |_, _| ()).is_some());
    }

    #[test]
    fn test_sweep_idle() {
        let store = Arc::new(MemoryStore::new());
        let registry = SessionRegistry::new();
        let owner = Uuid::new_v4();
        registry.insert(owner, Uuid::new_v4(), new_session(&store));
        registry.insert(owner, Uuid::new_v4(), new_session(&store));

        let idle = Duration::minutes(60);
        assert_eq!(registry.sweep_idle_at(idle, Utc::now()), 0);
        assert_eq!(
            registry.sweep_idle_at(idle, Utc::now() + Duration::minutes(61)),
            2
        );
        assert!(registry.is_empty());
    }
}
