//! Server-side sessions: handle → principal.
//!
//! The manager exclusively owns the handle table. Callers hold only the
//! handle; the principal is returned by value on each resolve.
//!
//! # Concurrency
//!
//! The table is split into [`SHARD_COUNT`] shards, each behind its own
//! `RwLock`, chosen by the first byte of the (uniformly random) handle.
//! Operations on handles in different shards never contend. Every operation
//! on a given handle takes that handle's shard lock exactly once for its
//! mutation, so per-handle operations are linearizable: a `resolve` racing an
//! `invalidate` sees either the whole binding or nothing.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use warden_types::{Principal, SessionHandle};

/// Number of independently locked shards.
pub const SHARD_COUNT: usize = 16;

/// A live binding from a handle to a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
}

type Shard = RwLock<HashMap<SessionHandle, Session>>;

/// Owns the handle → session table.
#[derive(Debug)]
pub struct SessionManager {
    shards: Box<[Shard]>,
    /// Sessions at least this old resolve as missing.
    max_age: Option<Duration>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Creates a manager with no implicit expiry.
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
            max_age: None,
        }
    }

    /// Sessions older than `max_age` stop resolving.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Binds `principal` to a fresh handle.
    ///
    /// The handle is 256 random bits. A collision with a live handle is
    /// detected under the shard lock and a new handle drawn, so a live handle
    /// is never rebound.
    pub fn create(&self, principal: Principal) -> SessionHandle {
        let created_at = Utc::now();
        loop {
            let handle = SessionHandle::generate();
            let mut shard = self.write(&handle);
            if let Entry::Vacant(slot) = shard.entry(handle) {
                info!(
                    identity = %principal.identity(),
                    session = %fingerprint(&handle),
                    "session created"
                );
                slot.insert(Session {
                    principal,
                    created_at,
                });
                return handle;
            }
        }
    }

    /// Returns the principal bound to `handle`, or `None` if the handle is
    /// unknown, invalidated, or past the configured max age.
    pub fn resolve(&self, handle: &SessionHandle) -> Option<Principal> {
        self.session(handle).map(|s| s.principal)
    }

    /// Returns the full session bound to `handle`.
    pub fn session(&self, handle: &SessionHandle) -> Option<Session> {
        let now = Utc::now();
        {
            let shard = self.read(handle);
            let session = shard.get(handle)?;
            if !self.is_expired(session, now) {
                return Some(session.clone());
            }
        }

        // Expired: remove under the write lock, re-checking in case the
        // binding changed between the two locks.
        let mut shard = self.write(handle);
        if shard.get(handle).is_some_and(|s| self.is_expired(s, now)) {
            shard.remove(handle);
            debug!(session = %fingerprint(handle), "session expired");
        }
        None
    }

    /// Removes the binding. Idempotent; returns whether a binding existed.
    pub fn invalidate(&self, handle: &SessionHandle) -> bool {
        let removed = self.write(handle).remove(handle).is_some();
        if removed {
            info!(session = %fingerprint(handle), "session invalidated");
        }
        removed
    }

    /// Removes every session created before `cutoff`. Returns the count.
    pub fn expire_created_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        for shard in &*self.shards {
            let mut shard = shard.write().unwrap_or_else(PoisonError::into_inner);
            let before = shard.len();
            shard.retain(|_, session| session.created_at >= cutoff);
            removed += before - shard.len();
        }
        if removed > 0 {
            info!(removed, "expired sessions removed");
        }
        removed
    }

    /// Removes every session at least `max_age` old. Returns the count.
    ///
    /// A `max_age` reaching past the earliest representable time matches no
    /// session.
    pub fn expire_older_than(&self, max_age: Duration) -> usize {
        match Utc::now().checked_sub_signed(max_age) {
            Some(cutoff) => self.expire_created_before(cutoff),
            None => 0,
        }
    }

    /// Number of live bindings (including any not yet pruned for age).
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        self.max_age
            .is_some_and(|max_age| now - session.created_at >= max_age)
    }

    fn shard(&self, handle: &SessionHandle) -> &Shard {
        &self.shards[usize::from(handle.as_bytes()[0]) % SHARD_COUNT]
    }

    // A panic while holding a shard lock cannot leave a half-applied insert
    // or remove, so poisoned locks are recovered rather than propagated.
    fn read(&self, handle: &SessionHandle) -> RwLockReadGuard<'_, HashMap<SessionHandle, Session>> {
        self.shard(handle)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
        handle: &SessionHandle,
    ) -> RwLockWriteGuard<'_, HashMap<SessionHandle, Session>> {
        self.shard(handle)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Short, non-reversible tag for a handle, safe to log.
pub fn fingerprint(handle: &SessionHandle) -> String {
    let digest = blake3::hash(handle.as_bytes());
    digest.to_hex().as_str()[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;
    use warden_types::{Attributes, Clearance, Role};

    fn principal(identity: &str) -> Principal {
        Principal::new(
            identity,
            Attributes::new("HR", Role::Admin, Clearance::new(3).unwrap(), 5),
        )
    }

    #[test]
    fn created_handle_resolves_to_principal() {
        let sessions = SessionManager::new();
        let handle = sessions.create(principal("adminHR"));
        assert_eq!(sessions.resolve(&handle), Some(principal("adminHR")));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn unknown_handle_is_missing() {
        let sessions = SessionManager::new();
        assert_eq!(sessions.resolve(&SessionHandle::generate()), None);
    }

    #[test]
    fn invalidate_is_final_and_idempotent() {
        let sessions = SessionManager::new();
        let handle = sessions.create(principal("adminHR"));

        assert!(sessions.invalidate(&handle));
        assert_eq!(sessions.resolve(&handle), None);
        assert!(!sessions.invalidate(&handle));
        assert!(!sessions.invalidate(&SessionHandle::generate()));
        assert_eq!(sessions.resolve(&handle), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn invalidate_leaves_other_sessions_alone() {
        let sessions = SessionManager::new();
        let a = sessions.create(principal("a"));
        let b = sessions.create(principal("b"));
        sessions.invalidate(&a);
        assert_eq!(sessions.resolve(&b), Some(principal("b")));
    }

    #[test]
    fn same_principal_gets_distinct_handles() {
        let sessions = SessionManager::new();
        let first = sessions.create(principal("adminHR"));
        let second = sessions.create(principal("adminHR"));
        assert_ne!(first, second);

        sessions.invalidate(&first);
        assert_eq!(sessions.resolve(&second), Some(principal("adminHR")));
    }

    #[test]
    fn session_records_creation_time() {
        let before = Utc::now();
        let sessions = SessionManager::new();
        let handle = sessions.create(principal("adminHR"));
        let session = sessions.session(&handle).unwrap();
        assert!(session.created_at >= before);
        assert!(session.created_at <= Utc::now());
    }

    #[test]
    fn zero_max_age_expires_on_resolve() {
        let sessions = SessionManager::new().with_max_age(Duration::zero());
        let handle = sessions.create(principal("adminHR"));
        assert_eq!(sessions.resolve(&handle), None);
        assert!(sessions.is_empty(), "expired session is pruned on resolve");
    }

    #[test]
    fn generous_max_age_keeps_sessions() {
        let sessions = SessionManager::new().with_max_age(Duration::hours(1));
        let handle = sessions.create(principal("adminHR"));
        assert!(sessions.resolve(&handle).is_some());
    }

    #[test]
    fn expire_created_before_prunes_by_cutoff() {
        let sessions = SessionManager::new();
        let handle = sessions.create(principal("a"));
        sessions.create(principal("b"));

        assert_eq!(sessions.expire_created_before(Utc::now() - Duration::hours(1)), 0);
        assert_eq!(sessions.len(), 2);

        assert_eq!(sessions.expire_created_before(Utc::now() + Duration::seconds(1)), 2);
        assert_eq!(sessions.resolve(&handle), None);
    }

    #[test]
    fn expire_older_than_keeps_fresh_sessions() {
        let sessions = SessionManager::new();
        sessions.create(principal("a"));
        assert_eq!(sessions.expire_older_than(Duration::hours(1)), 0);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn expire_older_than_tolerates_huge_max_age() {
        // About 31 million years: representable as a duration, not as a date.
        let max_age = Duration::seconds(1_000_000_000_000_000);
        let sessions = SessionManager::new().with_max_age(max_age);
        let handle = sessions.create(principal("a"));

        assert_eq!(sessions.expire_older_than(max_age), 0);
        assert_eq!(sessions.resolve(&handle), Some(principal("a")));
    }

    #[test]
    fn fingerprint_is_short_and_stable() {
        let handle = SessionHandle::from_bytes([7; 32]);
        assert_eq!(fingerprint(&handle).len(), 12);
        assert_eq!(fingerprint(&handle), fingerprint(&handle));
        assert!(!handle.to_string().starts_with(&fingerprint(&handle)));
    }

    #[test]
    fn concurrent_create_resolve_invalidate() {
        let sessions = Arc::new(SessionManager::new());

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let sessions = Arc::clone(&sessions);
                thread::spawn(move || {
                    for i in 0..200 {
                        let p = principal(&format!("user-{worker}-{i}"));
                        let handle = sessions.create(p.clone());
                        assert_eq!(sessions.resolve(&handle), Some(p));
                        if i % 2 == 0 {
                            assert!(sessions.invalidate(&handle));
                            assert_eq!(sessions.resolve(&handle), None);
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert_eq!(sessions.len(), 8 * 100);
    }

    #[test]
    fn resolve_racing_invalidate_sees_all_or_nothing() {
        let sessions = Arc::new(SessionManager::new());
        let expected = principal("adminHR");
        let handle = sessions.create(expected.clone());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let sessions = Arc::clone(&sessions);
                let expected = expected.clone();
                thread::spawn(move || {
                    let mut gone = false;
                    for _ in 0..1_000 {
                        match sessions.resolve(&handle) {
                            Some(p) => {
                                assert!(!gone, "handle resurrected after invalidation");
                                assert_eq!(p, expected);
                            }
                            None => gone = true,
                        }
                    }
                })
            })
            .collect();

        sessions.invalidate(&handle);
        for reader in readers {
            reader.join().expect("reader panicked");
        }
        assert_eq!(sessions.resolve(&handle), None);
    }

    proptest! {
        /// Property: a handle resolves until invalidated, then never again
        #[test]
        fn prop_no_resurrection(count in 1usize..20, victim in 0usize..20) {
            let sessions = SessionManager::new();
            let handles: Vec<_> = (0..count)
                .map(|i| sessions.create(principal(&format!("u{i}"))))
                .collect();
            let victim = victim % count;

            sessions.invalidate(&handles[victim]);
            sessions.invalidate(&handles[victim]);

            for (i, handle) in handles.iter().enumerate() {
                let resolved = sessions.resolve(handle);
                if i == victim {
                    prop_assert_eq!(resolved, None);
                } else {
                    prop_assert_eq!(resolved, Some(principal(&format!("u{i}"))));
                }
            }
            prop_assert_eq!(sessions.len(), count - 1);
        }
    }
}
